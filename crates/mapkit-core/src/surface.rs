//! Drawing surface abstraction
//!
//! A [`DrawingSurface`] is the rendering backend that actually paints
//! markers, lines and polygons and moves the camera. The tool layer never
//! touches a surface from the caller's thread: every call happens on the
//! single context that owns it, so the trait takes `&mut self` and needs
//! no internal synchronization.

use crate::color::Color;
use crate::error::SurfaceError;
use crate::geo::{BoundingBox, CameraAnimation, CameraPosition, LngLat};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for surface operations
pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

/// Kind of feature held by a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Point markers
    Point,
    /// Polylines
    Line,
    /// Filled polygons
    Polygon,
}

impl FeatureKind {
    /// All kinds, in the order groups are cleared
    pub const ALL: [FeatureKind; 3] = [FeatureKind::Point, FeatureKind::Line, FeatureKind::Polygon];

    /// Lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Point => "point",
            FeatureKind::Line => "line",
            FeatureKind::Polygon => "polygon",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle to a feature group created on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group-{}", self.0)
    }
}

/// A point marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LngLat,
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Color,
    /// Icon scale factor, 1.0 is the backend's default size
    pub size: f64,
}

/// Stroke styling for a polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub opacity: f64,
}

/// A polyline through an ordered list of positions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub points: Vec<LngLat>,
    pub style: LineStyle,
}

/// Fill and stroke styling for a polygon
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolygonStyle {
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
}

/// A filled polygon with a single outer ring
///
/// The ring is used exactly as given; it is not closed automatically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    pub ring: Vec<LngLat>,
    pub style: PolygonStyle,
}

/// Rendering backend driven by the map tools
///
/// Implementations are moved onto a dedicated thread, hence `Send`.
/// Feature-adding methods receive a whole batch at once and must either
/// add all of it or none of it.
pub trait DrawingSurface: Send {
    /// Create an empty group of the given kind
    fn create_group(&mut self, kind: FeatureKind, name: &str) -> SurfaceResult<GroupId>;

    /// Add markers to a point group
    fn add_markers(&mut self, group: GroupId, markers: &[Marker]) -> SurfaceResult<()>;

    /// Add a polyline to a line group
    fn add_polyline(&mut self, group: GroupId, line: &Polyline) -> SurfaceResult<()>;

    /// Add a polygon to a polygon group
    fn add_polygon(&mut self, group: GroupId, polygon: &Polygon) -> SurfaceResult<()>;

    /// Delete every feature in a group and the group itself
    fn delete_group(&mut self, group: GroupId) -> SurfaceResult<()>;

    /// Current camera position
    fn camera(&self) -> CameraPosition;

    /// Move the camera
    fn move_camera(
        &mut self,
        camera: CameraPosition,
        animation: CameraAnimation,
    ) -> SurfaceResult<()>;

    /// Compute a camera that frames `bounds` with `padding` pixels on each side
    fn camera_for_bounds(&self, bounds: &BoundingBox, padding: f64)
    -> SurfaceResult<CameraPosition>;

    /// Replace the visual style
    ///
    /// Backends typically discard every feature group when the style
    /// reloads.
    fn load_style(&mut self, style_url: &str) -> SurfaceResult<()>;
}

impl<S: DrawingSurface + ?Sized> DrawingSurface for Box<S> {
    fn create_group(&mut self, kind: FeatureKind, name: &str) -> SurfaceResult<GroupId> {
        (**self).create_group(kind, name)
    }

    fn add_markers(&mut self, group: GroupId, markers: &[Marker]) -> SurfaceResult<()> {
        (**self).add_markers(group, markers)
    }

    fn add_polyline(&mut self, group: GroupId, line: &Polyline) -> SurfaceResult<()> {
        (**self).add_polyline(group, line)
    }

    fn add_polygon(&mut self, group: GroupId, polygon: &Polygon) -> SurfaceResult<()> {
        (**self).add_polygon(group, polygon)
    }

    fn delete_group(&mut self, group: GroupId) -> SurfaceResult<()> {
        (**self).delete_group(group)
    }

    fn camera(&self) -> CameraPosition {
        (**self).camera()
    }

    fn move_camera(
        &mut self,
        camera: CameraPosition,
        animation: CameraAnimation,
    ) -> SurfaceResult<()> {
        (**self).move_camera(camera, animation)
    }

    fn camera_for_bounds(
        &self,
        bounds: &BoundingBox,
        padding: f64,
    ) -> SurfaceResult<CameraPosition> {
        (**self).camera_for_bounds(bounds, padding)
    }

    fn load_style(&mut self, style_url: &str) -> SurfaceResult<()> {
        (**self).load_style(style_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_kind_names() {
        assert_eq!(FeatureKind::Point.to_string(), "point");
        assert_eq!(
            serde_json::to_value(FeatureKind::Polygon).unwrap(),
            serde_json::json!("polygon")
        );
        assert_eq!(FeatureKind::ALL.len(), 3);
    }

    #[test]
    fn test_group_id_display() {
        assert_eq!(GroupId(7).to_string(), "group-7");
    }
}
