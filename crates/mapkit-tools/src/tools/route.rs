//! Tool for drawing routes

use crate::command::MapCommand;
use crate::schema::{InputSchema, Property};
use crate::tool::MapTool;
use crate::tools::{coordinates_property, layer_name, require_at_least};
use mapkit_core::{Color, LineStyle, ParamError, Params, Polyline};
use serde_json::json;

pub const DEFAULT_LAYER: &str = "route";
pub const DEFAULT_LINE_COLOR: Color = Color::rgb(0x3B, 0x9D, 0xDD);
pub const DEFAULT_LINE_WIDTH: f64 = 4.0;
pub const DEFAULT_LINE_OPACITY: f64 = 0.8;

/// Tool for drawing a polyline through a list of positions
#[derive(Debug, Default)]
pub struct AddRouteTool;

impl AddRouteTool {
    /// Create the tool
    pub fn new() -> Self {
        Self
    }
}

impl MapTool for AddRouteTool {
    fn name(&self) -> &'static str {
        "add_route_to_map"
    }

    fn description(&self) -> &'static str {
        "Draw a route (polyline) on the map through the given coordinates, in order. \
         Coordinates are [longitude, latitude] pairs; at least two are needed."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object(
            [
                (
                    "coordinates",
                    coordinates_property("Route positions as [longitude, latitude] pairs"),
                ),
                (
                    "layerName",
                    Property::string("Name of the layer to draw the route in")
                        .with_default(json!(DEFAULT_LAYER)),
                ),
                (
                    "lineColor",
                    Property::string("Line color as a hex string")
                        .with_default(json!(DEFAULT_LINE_COLOR.to_hex())),
                ),
                (
                    "lineWidth",
                    Property::number("Line width in pixels").with_default(json!(DEFAULT_LINE_WIDTH)),
                ),
                (
                    "lineOpacity",
                    Property::number("Line opacity from 0 to 1")
                        .with_default(json!(DEFAULT_LINE_OPACITY)),
                ),
            ],
            &["coordinates"],
        )
    }

    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError> {
        let points = params.required_lng_lat_list("coordinates")?;
        require_at_least(params, "coordinates", points.len(), 2, "coordinate pairs")?;

        let style = LineStyle {
            color: params.color_or("lineColor", DEFAULT_LINE_COLOR),
            width: params.non_negative_f64_or("lineWidth", DEFAULT_LINE_WIDTH)?,
            opacity: params.opacity_or("lineOpacity", DEFAULT_LINE_OPACITY)?,
        };

        Ok(MapCommand::AddRoute {
            layer: layer_name(params, DEFAULT_LAYER)?,
            line: Polyline { points, style },
        })
    }
}
