//! Tool for drawing filled polygons

use crate::command::MapCommand;
use crate::schema::{InputSchema, Property};
use crate::tool::MapTool;
use crate::tools::{coordinates_property, layer_name, require_at_least};
use mapkit_core::{Color, ParamError, Params, Polygon, PolygonStyle};
use serde_json::json;

pub const DEFAULT_LAYER: &str = "polygon";
pub const DEFAULT_FILL_COLOR: Color = Color::rgb(0x3B, 0x9D, 0xDD);
pub const DEFAULT_FILL_OPACITY: f64 = 0.5;
pub const DEFAULT_STROKE_COLOR: Color = Color::rgb(0x00, 0x00, 0x00);
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Tool for drawing a filled polygon
///
/// The ring is drawn in the order given and is not closed automatically.
#[derive(Debug, Default)]
pub struct AddPolygonTool;

impl AddPolygonTool {
    /// Create the tool
    pub fn new() -> Self {
        Self
    }
}

impl MapTool for AddPolygonTool {
    fn name(&self) -> &'static str {
        "add_polygon_to_map"
    }

    fn description(&self) -> &'static str {
        "Draw a filled polygon (area) on the map. \
         Coordinates are [longitude, latitude] pairs outlining the area; at least three are needed."
    }

    fn input_schema(&self) -> InputSchema {
        InputSchema::object(
            [
                (
                    "coordinates",
                    coordinates_property("Polygon outline as [longitude, latitude] pairs"),
                ),
                (
                    "layerName",
                    Property::string("Name of the layer to draw the polygon in")
                        .with_default(json!(DEFAULT_LAYER)),
                ),
                (
                    "fillColor",
                    Property::string("Fill color as a hex string")
                        .with_default(json!(DEFAULT_FILL_COLOR.to_hex())),
                ),
                (
                    "fillOpacity",
                    Property::number("Fill opacity from 0 to 1")
                        .with_default(json!(DEFAULT_FILL_OPACITY)),
                ),
                (
                    "strokeColor",
                    Property::string("Outline color as a hex string")
                        .with_default(json!(DEFAULT_STROKE_COLOR.to_hex())),
                ),
                (
                    "strokeWidth",
                    Property::number("Outline width in pixels")
                        .with_default(json!(DEFAULT_STROKE_WIDTH)),
                ),
            ],
            &["coordinates"],
        )
    }

    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError> {
        let ring = params.required_lng_lat_list("coordinates")?;
        require_at_least(params, "coordinates", ring.len(), 3, "coordinate pairs")?;

        let style = PolygonStyle {
            fill_color: params.color_or("fillColor", DEFAULT_FILL_COLOR),
            fill_opacity: params.opacity_or("fillOpacity", DEFAULT_FILL_OPACITY)?,
            stroke_color: params.color_or("strokeColor", DEFAULT_STROKE_COLOR),
            stroke_width: params.non_negative_f64_or("strokeWidth", DEFAULT_STROKE_WIDTH)?,
        };

        Ok(MapCommand::AddPolygon {
            layer: layer_name(params, DEFAULT_LAYER)?,
            polygon: Polygon { ring, style },
        })
    }
}
