//! Tool for framing a set of positions

use crate::command::MapCommand;
use crate::schema::{InputSchema, Property};
use crate::tool::MapTool;
use crate::tools::coordinates_property;
use mapkit_core::{BoundingBox, ParamError, Params};
use serde_json::json;

pub const DEFAULT_PADDING: f64 = 50.0;

/// Tool for fitting the camera to the bounding box of some positions
#[derive(Debug, Default)]
pub struct FitBoundsTool;

impl FitBoundsTool {
    /// Create the tool
    pub fn new() -> Self {
        Self
    }
}

impl MapTool for FitBoundsTool {
    fn name(&self) -> &'static str {
        "fit_map_to_bounds"
    }

    fn description(&self) -> &'static str {
        "Adjust the map camera so that all of the given coordinates are visible. \
         Coordinates are [longitude, latitude] pairs."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object(
            [
                (
                    "coordinates",
                    coordinates_property("Positions to keep in view as [longitude, latitude] pairs"),
                ),
                (
                    "padding",
                    Property::number("Padding around the bounds in pixels")
                        .with_default(json!(DEFAULT_PADDING)),
                ),
                (
                    "animated",
                    Property::boolean("Whether to animate the camera move").with_default(json!(true)),
                ),
            ],
            &["coordinates"],
        )
    }

    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError> {
        let points = params.required_lng_lat_list("coordinates")?;
        let bounds = BoundingBox::from_points(&points).ok_or_else(|| {
            ParamError::invalid(
                params.field("coordinates"),
                "at least 1 coordinate pair required, got 0",
            )
        })?;

        Ok(MapCommand::FitBounds {
            bounds,
            padding: params.non_negative_f64_or("padding", DEFAULT_PADDING)?,
            animated: params.bool_or("animated", true)?,
        })
    }
}
