//! Tool for adding point markers

use crate::command::MapCommand;
use crate::schema::{InputSchema, Property};
use crate::tool::MapTool;
use crate::tools::{layer_name, require_at_least};
use mapkit_core::params::json_type;
use mapkit_core::{Color, LngLat, Marker, ParamError, Params};
use serde_json::json;

/// Layer used when `layerName` is omitted
pub const DEFAULT_LAYER: &str = "points";
/// Marker color used when `iconColor` is omitted or unparseable
pub const DEFAULT_ICON_COLOR: Color = Color::rgb(0xFF, 0x00, 0x00);
/// Marker scale used when `iconSize` is omitted
pub const DEFAULT_ICON_SIZE: f64 = 1.0;

/// Tool for adding markers to a named layer
#[derive(Debug, Default)]
pub struct AddPointsTool;

impl AddPointsTool {
    /// Create the tool
    pub fn new() -> Self {
        Self
    }
}

impl MapTool for AddPointsTool {
    fn name(&self) -> &'static str {
        "add_points_to_map"
    }

    fn description(&self) -> &'static str {
        "Add one or more point markers to the map. \
         Markers are grouped under a layer name so they can be cleared together later; \
         calling this again with the same layer name adds to the existing layer."
    }

    fn input_schema(&self) -> InputSchema {
        let point = Property::object(
            "A point to mark",
            [
                ("lat", Property::number("Latitude in degrees")),
                ("lng", Property::number("Longitude in degrees")),
                ("title", Property::string("Optional marker title")),
                ("description", Property::string("Optional marker description")),
            ],
            &["lat", "lng"],
        );

        InputSchema::object(
            [
                ("points", Property::array("Points to add to the map", point)),
                (
                    "layerName",
                    Property::string("Name of the layer to add the points to")
                        .with_default(json!(DEFAULT_LAYER)),
                ),
                (
                    "iconColor",
                    Property::string("Marker color as a hex string, e.g. #FF0000")
                        .with_default(json!(DEFAULT_ICON_COLOR.to_hex())),
                ),
                (
                    "iconSize",
                    Property::number("Marker size multiplier")
                        .with_default(json!(DEFAULT_ICON_SIZE)),
                ),
            ],
            &["points"],
        )
    }

    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError> {
        let items = params.required_array("points")?;
        require_at_least(params, "points", items.len(), 1, "point(s)")?;

        let layer = layer_name(params, DEFAULT_LAYER)?;
        let color = params.color_or("iconColor", DEFAULT_ICON_COLOR);
        let size = params.non_negative_f64_or("iconSize", DEFAULT_ICON_SIZE)?;

        let markers = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let path = format!("{}[{i}]", params.field("points"));
                let Some(map) = item.as_object() else {
                    return Err(ParamError::WrongType {
                        field: path,
                        expected: "object",
                        found: json_type(item),
                    });
                };

                let point = Params::nested(map, &path);
                Ok(Marker {
                    position: LngLat::new(point.required_f64("lng")?, point.required_f64("lat")?),
                    title: point.optional_str("title")?.map(str::to_string),
                    description: point.optional_str("description")?.map(str::to_string),
                    color,
                    size,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MapCommand::AddMarkers { layer, markers })
    }
}
