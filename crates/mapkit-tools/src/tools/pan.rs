//! Tool for moving the camera

use crate::command::MapCommand;
use crate::schema::{InputSchema, Property};
use crate::tool::MapTool;
use mapkit_core::{CameraAnimation, LngLat, ParamError, Params};
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_DURATION_MS: f64 = 1000.0;

/// Tool for centering the map on a location
#[derive(Debug, Default)]
pub struct PanTool;

impl PanTool {
    /// Create the tool
    pub fn new() -> Self {
        Self
    }
}

impl MapTool for PanTool {
    fn name(&self) -> &'static str {
        "pan_map_to_location"
    }

    fn description(&self) -> &'static str {
        "Move the map camera to center on a location. \
         Optionally change the zoom level; the current zoom is kept when omitted."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object(
            [
                ("latitude", Property::number("Latitude of the new center")),
                ("longitude", Property::number("Longitude of the new center")),
                ("zoom", Property::number("Zoom level, e.g. 10 for a city")),
                (
                    "animated",
                    Property::boolean("Whether to animate the camera move").with_default(json!(true)),
                ),
                (
                    "duration",
                    Property::number("Animation duration in milliseconds")
                        .with_default(json!(DEFAULT_DURATION_MS)),
                ),
            ],
            &["latitude", "longitude"],
        )
    }

    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError> {
        let center = LngLat::new(
            params.required_f64("longitude")?,
            params.required_f64("latitude")?,
        );
        let zoom = params.optional_f64("zoom")?;
        let animated = params.bool_or("animated", true)?;
        let duration_ms = params.non_negative_f64_or("duration", DEFAULT_DURATION_MS)?;
        let duration = Duration::try_from_secs_f64(duration_ms / 1000.0)
            .map_err(|e| ParamError::invalid(params.field("duration"), e.to_string()))?;

        Ok(MapCommand::Pan {
            center,
            zoom,
            animation: CameraAnimation::from_flag(animated, duration),
        })
    }
}
