//! Tool for switching the map style

use crate::command::MapCommand;
use crate::schema::{InputSchema, Property};
use crate::tool::MapTool;
use mapkit_core::{ParamError, Params};

/// Tool for loading a different map style
#[derive(Debug, Default)]
pub struct SetStyleTool;

impl SetStyleTool {
    /// Create the tool
    pub fn new() -> Self {
        Self
    }
}

impl MapTool for SetStyleTool {
    fn name(&self) -> &'static str {
        "set_map_style"
    }

    fn description(&self) -> &'static str {
        "Change the visual style of the map, e.g. mapbox://styles/mapbox/streets-v12, \
         mapbox://styles/mapbox/satellite-v9 or mapbox://styles/mapbox/dark-v11. \
         Layers drawn before the change may have to be drawn again."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object(
            [("styleUrl", Property::string("Style URL or identifier to load"))],
            &["styleUrl"],
        )
    }

    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError> {
        let style_url = params.required_str("styleUrl")?.trim();
        if style_url.is_empty() {
            return Err(ParamError::invalid(
                params.field("styleUrl"),
                "must not be empty",
            ));
        }

        Ok(MapCommand::SetStyle {
            style_url: style_url.to_string(),
        })
    }
}
