//! Tool for removing layers

use crate::command::{ClearTarget, MapCommand};
use crate::schema::{InputSchema, Property};
use crate::tool::MapTool;
use mapkit_core::{ParamError, Params};

/// Tool for clearing some or all layers
///
/// A layer name covers every feature kind drawn under it.
#[derive(Debug, Default)]
pub struct ClearLayersTool;

impl ClearLayersTool {
    /// Create the tool
    pub fn new() -> Self {
        Self
    }
}

impl MapTool for ClearLayersTool {
    fn name(&self) -> &'static str {
        "clear_map_layers"
    }

    fn description(&self) -> &'static str {
        "Remove layers from the map. \
         Pass layerNames to remove specific layers, or omit it to clear everything."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object(
            [(
                "layerNames",
                Property::array(
                    "Names of the layers to remove; all layers when omitted",
                    Property::string("Layer name"),
                ),
            )],
            &[],
        )
    }

    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError> {
        let target = match params.optional_string_list("layerNames")? {
            Some(names) if !names.is_empty() => ClearTarget::Named(names),
            _ => ClearTarget::All,
        };
        Ok(MapCommand::ClearLayers(target))
    }
}
