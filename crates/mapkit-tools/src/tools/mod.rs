//! Built-in map tools

pub mod clear;
pub mod fit_bounds;
pub mod pan;
pub mod points;
pub mod polygon;
pub mod route;
pub mod style;

pub use clear::ClearLayersTool;
pub use fit_bounds::FitBoundsTool;
pub use pan::PanTool;
pub use points::AddPointsTool;
pub use polygon::AddPolygonTool;
pub use route::AddRouteTool;
pub use style::SetStyleTool;

use crate::schema::Property;
use mapkit_core::{ParamError, Params};

/// Schema of a `[[lng, lat], ...]` coordinate list
pub(crate) fn coordinates_property(description: &str) -> Property {
    Property::array(
        description,
        Property::array(
            "[longitude, latitude] pair",
            Property::number("").without_description(),
        ),
    )
}

/// Layer name parameter, falling back to `default` when absent or empty
pub(crate) fn layer_name(params: &Params<'_>, default: &str) -> Result<String, ParamError> {
    Ok(params.str_or("layerName", default)?.to_string())
}

/// Fail unless `count` reaches `min`
pub(crate) fn require_at_least(
    params: &Params<'_>,
    key: &str,
    count: usize,
    min: usize,
    what: &str,
) -> Result<(), ParamError> {
    if count < min {
        return Err(ParamError::invalid(
            params.field(key),
            format!("at least {min} {what} required, got {count}"),
        ));
    }
    Ok(())
}
