//! In-memory drawing surface
//!
//! [`MemorySurface`] records every group, feature, camera move and style
//! change instead of painting them. It backs the command-line tool and is
//! the surface of choice for tests: clones share the same state, so one
//! clone can be handed to the dispatcher while another is used to inspect
//! what was drawn.

use crate::error::SurfaceError;
use crate::geo::{BoundingBox, CameraAnimation, CameraPosition};
use crate::surface::{
    DrawingSurface, FeatureKind, GroupId, Marker, Polygon, Polyline, SurfaceResult,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Tile size used by web-mercator zoom levels
const TILE_SIZE: f64 = 256.0;
/// Zoom used when the bounds collapse to a single point
const MAX_FIT_ZOOM: f64 = 16.0;

/// A feature group held by a [`MemorySurface`]
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryGroup {
    pub kind: FeatureKind,
    pub name: String,
    pub markers: Vec<Marker>,
    pub lines: Vec<Polyline>,
    pub polygons: Vec<Polygon>,
}

impl MemoryGroup {
    fn new(kind: FeatureKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            markers: Vec::new(),
            lines: Vec::new(),
            polygons: Vec::new(),
        }
    }

    /// Number of features in the group
    pub fn feature_count(&self) -> usize {
        self.markers.len() + self.lines.len() + self.polygons.len()
    }
}

/// Everything a [`MemorySurface`] has recorded
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub groups: BTreeMap<GroupId, MemoryGroup>,
    pub camera: CameraPosition,
    pub style: Option<String>,
    /// Every camera move, in order
    pub camera_moves: Vec<(CameraPosition, CameraAnimation)>,
    next_id: u64,
}

impl MemoryState {
    /// Groups of the given kind and name
    pub fn groups_named(&self, kind: FeatureKind, name: &str) -> Vec<&MemoryGroup> {
        self.groups
            .values()
            .filter(|g| g.kind == kind && g.name == name)
            .collect()
    }

    /// The single group of the given kind and name, if there is one
    pub fn group(&self, kind: FeatureKind, name: &str) -> Option<&MemoryGroup> {
        self.groups_named(kind, name).into_iter().next()
    }

    /// Total number of features across all groups
    pub fn feature_count(&self) -> usize {
        self.groups.values().map(MemoryGroup::feature_count).sum()
    }
}

/// Headless [`DrawingSurface`] that records instead of rendering
#[derive(Debug, Clone)]
pub struct MemorySurface {
    state: Arc<Mutex<MemoryState>>,
    viewport: (f64, f64),
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            viewport: (1024.0, 768.0),
        }
    }
}

impl MemorySurface {
    /// Create a surface with a 1024x768 viewport
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport size in pixels, used by `camera_for_bounds`
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = (width, height);
        self
    }

    /// Set the initial camera
    pub fn with_camera(self, camera: CameraPosition) -> Self {
        self.lock().camera = camera;
        self
    }

    /// Copy of the recorded state
    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // The state stays readable even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_group<F>(&self, group: GroupId, kind: FeatureKind, f: F) -> SurfaceResult<()>
    where
        F: FnOnce(&mut MemoryGroup),
    {
        let mut state = self.lock();
        let entry = state
            .groups
            .get_mut(&group)
            .ok_or(SurfaceError::UnknownGroup(group))?;
        if entry.kind != kind {
            return Err(SurfaceError::rejected(
                "add_features",
                format!("{group} holds {} features, not {kind}", entry.kind),
            ));
        }
        f(entry);
        Ok(())
    }
}

impl DrawingSurface for MemorySurface {
    fn create_group(&mut self, kind: FeatureKind, name: &str) -> SurfaceResult<GroupId> {
        let mut state = self.lock();
        state.next_id += 1;
        let id = GroupId(state.next_id);
        state.groups.insert(id, MemoryGroup::new(kind, name));
        debug!(group = %id, kind = %kind, name = %name, "Created group");
        Ok(id)
    }

    fn add_markers(&mut self, group: GroupId, markers: &[Marker]) -> SurfaceResult<()> {
        self.with_group(group, FeatureKind::Point, |g| {
            g.markers.extend_from_slice(markers);
        })
    }

    fn add_polyline(&mut self, group: GroupId, line: &Polyline) -> SurfaceResult<()> {
        self.with_group(group, FeatureKind::Line, |g| g.lines.push(line.clone()))
    }

    fn add_polygon(&mut self, group: GroupId, polygon: &Polygon) -> SurfaceResult<()> {
        self.with_group(group, FeatureKind::Polygon, |g| {
            g.polygons.push(polygon.clone());
        })
    }

    fn delete_group(&mut self, group: GroupId) -> SurfaceResult<()> {
        self.lock()
            .groups
            .remove(&group)
            .map(|_| ())
            .ok_or(SurfaceError::UnknownGroup(group))
    }

    fn camera(&self) -> CameraPosition {
        self.lock().camera
    }

    fn move_camera(
        &mut self,
        camera: CameraPosition,
        animation: CameraAnimation,
    ) -> SurfaceResult<()> {
        let mut state = self.lock();
        state.camera = camera;
        state.camera_moves.push((camera, animation));
        Ok(())
    }

    /// Equirectangular fit: latitude spans are scaled linearly, like
    /// longitude, and the camera centers on the box midpoint.
    fn camera_for_bounds(
        &self,
        bounds: &BoundingBox,
        padding: f64,
    ) -> SurfaceResult<CameraPosition> {
        let (width, height) = self.viewport;
        let usable_width = width - 2.0 * padding;
        let usable_height = height - 2.0 * padding;
        if usable_width <= 0.0 || usable_height <= 0.0 {
            return Err(SurfaceError::rejected(
                "camera_for_bounds",
                format!("padding {padding}px leaves no room in a {width}x{height} viewport"),
            ));
        }

        let zoom_for = |pixels: f64, span: f64| {
            if span <= 0.0 {
                MAX_FIT_ZOOM
            } else {
                (pixels * 360.0 / (TILE_SIZE * span)).log2()
            }
        };
        let zoom = zoom_for(usable_width, bounds.width())
            .min(zoom_for(usable_height, bounds.height()))
            .clamp(0.0, MAX_FIT_ZOOM);

        Ok(CameraPosition::new(bounds.center(), zoom))
    }

    fn load_style(&mut self, style_url: &str) -> SurfaceResult<()> {
        if style_url.trim().is_empty() {
            return Err(SurfaceError::StyleLoad {
                url: style_url.to_string(),
                reason: "empty style URL".to_string(),
            });
        }

        let mut state = self.lock();
        state.groups.clear();
        state.style = Some(style_url.to_string());
        debug!(style_url = %style_url, "Loaded style, feature groups discarded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::geo::LngLat;
    use std::time::Duration;

    fn marker(lng: f64, lat: f64) -> Marker {
        Marker {
            position: LngLat::new(lng, lat),
            title: None,
            description: None,
            color: Color::rgb(0xFF, 0, 0),
            size: 1.0,
        }
    }

    #[test]
    fn test_groups_and_markers() {
        let mut surface = MemorySurface::new();
        let observer = surface.clone();

        let id = surface.create_group(FeatureKind::Point, "cities").unwrap();
        surface
            .add_markers(id, &[marker(0.0, 0.0), marker(1.0, 1.0)])
            .unwrap();

        let state = observer.snapshot();
        let group = state.group(FeatureKind::Point, "cities").unwrap();
        assert_eq!(group.markers.len(), 2);
        assert_eq!(state.feature_count(), 2);

        surface.delete_group(id).unwrap();
        assert!(observer.snapshot().groups.is_empty());
        assert_eq!(
            surface.delete_group(id),
            Err(SurfaceError::UnknownGroup(id))
        );
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let mut surface = MemorySurface::new();
        let id = surface.create_group(FeatureKind::Line, "route").unwrap();
        let err = surface.add_markers(id, &[marker(0.0, 0.0)]).unwrap_err();
        assert!(matches!(err, SurfaceError::Rejected { .. }));
    }

    #[test]
    fn test_camera_moves() {
        let mut surface = MemorySurface::new();
        let target = CameraPosition::new(LngLat::new(10.0, 20.0), 12.0);
        let animation = CameraAnimation::Animated {
            duration: Duration::from_millis(500),
        };

        surface.move_camera(target, animation).unwrap();
        assert_eq!(surface.camera(), target);
        assert_eq!(surface.snapshot().camera_moves, vec![(target, animation)]);
    }

    #[test]
    fn test_camera_for_bounds() {
        let surface = MemorySurface::new().with_viewport(800.0, 600.0);
        let bounds = BoundingBox {
            min: LngLat::new(0.0, 0.0),
            max: LngLat::new(2.0, 2.0),
        };

        let camera = surface.camera_for_bounds(&bounds, 50.0).unwrap();
        assert_eq!(camera.center, LngLat::new(1.0, 1.0));
        assert!(camera.zoom > 0.0 && camera.zoom <= MAX_FIT_ZOOM);

        // More padding leaves less room, so the fit zooms out
        let padded = surface.camera_for_bounds(&bounds, 200.0).unwrap();
        assert!(padded.zoom < camera.zoom);

        assert!(surface.camera_for_bounds(&bounds, 400.0).is_err());
    }

    #[test]
    fn test_camera_for_bounds_scales_latitude_linearly() {
        let surface = MemorySurface::new().with_viewport(800.0, 800.0);
        let at = |lat: f64| BoundingBox {
            min: LngLat::new(0.0, lat),
            max: LngLat::new(1.0, lat + 1.0),
        };

        let equator = surface.camera_for_bounds(&at(0.0), 0.0).unwrap();
        let north = surface.camera_for_bounds(&at(60.0), 0.0).unwrap();
        assert!((equator.zoom - north.zoom).abs() < 1e-9);
        assert_eq!(north.center, LngLat::new(0.5, 60.5));
    }

    #[test]
    fn test_load_style_discards_groups() {
        let mut surface = MemorySurface::new();
        surface.create_group(FeatureKind::Polygon, "zone").unwrap();

        surface.load_style("mapbox://styles/mapbox/dark-v11").unwrap();
        let state = surface.snapshot();
        assert!(state.groups.is_empty());
        assert_eq!(state.style.as_deref(), Some("mapbox://styles/mapbox/dark-v11"));

        assert!(matches!(
            surface.load_style(" "),
            Err(SurfaceError::StyleLoad { .. })
        ));
    }
}
