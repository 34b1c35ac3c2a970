//! Validated map commands
//!
//! A [`MapCommand`] is what a tool call becomes once its parameters have
//! been coerced: fully typed, defaults applied, ready to run. Commands are
//! applied on the surface thread, which owns both the drawing surface and
//! the [`LayerStore`].

use crate::layers::LayerStore;
use mapkit_core::{
    BoundingBox, CameraAnimation, CameraPosition, DrawingSurface, FeatureKind, GroupId, LngLat,
    Marker, Polygon, Polyline, SurfaceError, SurfaceResult,
};
use mapkit_utils::{MapkitConfig, StyleChangePolicy};
use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};
use std::time::Duration;
use tracing::{debug, warn};

/// Which layers a clear affects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearTarget {
    /// Every tracked layer
    All,
    /// Only the named layers; unknown names are ignored
    Named(Vec<String>),
}

/// A fully validated map operation
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// Add markers to a layer's point group
    AddMarkers { layer: String, markers: Vec<Marker> },

    /// Add a polyline to a layer's line group
    AddRoute { layer: String, line: Polyline },

    /// Add a polygon to a layer's polygon group
    AddPolygon { layer: String, polygon: Polygon },

    /// Move the camera; `zoom: None` keeps the current zoom
    Pan {
        center: LngLat,
        zoom: Option<f64>,
        animation: CameraAnimation,
    },

    /// Frame a bounding box
    FitBounds {
        bounds: BoundingBox,
        padding: f64,
        animated: bool,
    },

    /// Delete layers
    ClearLayers(ClearTarget),

    /// Load a new style
    SetStyle { style_url: String },
}

/// Settings the surface thread applies commands with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplySettings {
    pub style_change: StyleChangePolicy,
    pub fit_duration: Duration,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self::from(&MapkitConfig::default())
    }
}

impl From<&MapkitConfig> for ApplySettings {
    fn from(config: &MapkitConfig) -> Self {
        Self {
            style_change: config.style_change,
            fit_duration: config.fit_duration(),
        }
    }
}

impl MapCommand {
    /// Confirmation reported when the command is accepted
    pub fn accepted_message(&self) -> String {
        match self {
            MapCommand::AddMarkers { layer, markers } => {
                format!("Added {} point(s) to layer '{layer}'", markers.len())
            }
            MapCommand::AddRoute { layer, line } => format!(
                "Added route with {} point(s) to layer '{layer}'",
                line.points.len()
            ),
            MapCommand::AddPolygon { layer, polygon } => format!(
                "Added polygon with {} vertices to layer '{layer}'",
                polygon.ring.len()
            ),
            MapCommand::Pan { center, zoom, .. } => match zoom {
                Some(zoom) => format!(
                    "Panned map to ({}, {}) at zoom {zoom}",
                    center.lat, center.lng
                ),
                None => format!("Panned map to ({}, {})", center.lat, center.lng),
            },
            MapCommand::FitBounds { bounds, .. } => format!(
                "Fit map to bounds ({}, {}) - ({}, {})",
                bounds.min.lat, bounds.min.lng, bounds.max.lat, bounds.max.lng
            ),
            MapCommand::ClearLayers(ClearTarget::All) => "Cleared all layers".to_string(),
            MapCommand::ClearLayers(ClearTarget::Named(names)) => {
                format!("Cleared layer(s): {}", names.join(", "))
            }
            MapCommand::SetStyle { style_url } => format!("Map style set to {style_url}"),
        }
    }

    /// Apply the command, returning a confirmation of what was done
    ///
    /// Layer bookkeeping only changes for work the surface accepted, so a
    /// failure leaves the store matching the surface.
    pub fn apply(
        self,
        surface: &mut dyn DrawingSurface,
        layers: &mut LayerStore,
        settings: &ApplySettings,
    ) -> SurfaceResult<String> {
        let message = self.accepted_message();

        match self {
            MapCommand::AddMarkers { layer, markers } => {
                add_features(surface, layers, &layer, FeatureKind::Point, markers.len(), |s, id| {
                    s.add_markers(id, &markers)
                })?;
            }
            MapCommand::AddRoute { layer, line } => {
                add_features(surface, layers, &layer, FeatureKind::Line, 1, |s, id| {
                    s.add_polyline(id, &line)
                })?;
            }
            MapCommand::AddPolygon { layer, polygon } => {
                add_features(surface, layers, &layer, FeatureKind::Polygon, 1, |s, id| {
                    s.add_polygon(id, &polygon)
                })?;
            }
            MapCommand::Pan {
                center,
                zoom,
                animation,
            } => {
                let zoom = zoom.unwrap_or_else(|| surface.camera().zoom);
                surface.move_camera(CameraPosition::new(center, zoom), animation)?;
            }
            MapCommand::FitBounds {
                bounds,
                padding,
                animated,
            } => {
                let camera = surface.camera_for_bounds(&bounds, padding)?;
                let animation = CameraAnimation::from_flag(animated, settings.fit_duration);
                surface.move_camera(camera, animation)?;
            }
            MapCommand::ClearLayers(target) => {
                let cleared = clear_layers(surface, layers, &target)?;
                return Ok(match target {
                    ClearTarget::All => format!("Cleared all layers ({cleared} removed)"),
                    ClearTarget::Named(names) => {
                        format!("Cleared {cleared} of {} requested layer(s)", names.len())
                    }
                });
            }
            MapCommand::SetStyle { style_url } => {
                surface.load_style(&style_url)?;
                if settings.style_change == StyleChangePolicy::ResetLayers {
                    let forgotten = layers.clear();
                    debug!(forgotten, "Style changed, layer bookkeeping reset");
                }
            }
        }

        Ok(message)
    }
}

/// Add features to the layer's group of `kind`, creating the group if needed
///
/// A tracked group the surface no longer knows, e.g. after a style reload
/// under [`StyleChangePolicy::KeepLayers`], is forgotten and recreated. A
/// freshly created group is deleted again if the add fails or panics.
fn add_features<F>(
    surface: &mut dyn DrawingSurface,
    layers: &mut LayerStore,
    layer: &str,
    kind: FeatureKind,
    count: usize,
    mut add: F,
) -> SurfaceResult<()>
where
    F: FnMut(&mut dyn DrawingSurface, GroupId) -> SurfaceResult<()>,
{
    if let Some(group) = layers.group(layer, kind) {
        match add(&mut *surface, group.id) {
            Ok(()) => {
                layers.record(layer, kind, group.id, count);
                return Ok(());
            }
            Err(SurfaceError::UnknownGroup(_)) => {
                debug!(
                    layer = %layer,
                    group = %group.id,
                    "Tracked group is gone from the surface, recreating"
                );
                layers.remove_group(layer, kind);
            }
            Err(err) => return Err(err),
        }
    }

    let id = surface.create_group(kind, layer)?;
    match catch_unwind(AssertUnwindSafe(|| add(&mut *surface, id))) {
        Ok(Ok(())) => {
            layers.record(layer, kind, id, count);
            Ok(())
        }
        Ok(Err(err)) => {
            discard_group(surface, id);
            Err(err)
        }
        Err(payload) => {
            discard_group(surface, id);
            resume_unwind(payload)
        }
    }
}

fn discard_group(surface: &mut dyn DrawingSurface, id: GroupId) {
    if let Err(err) = surface.delete_group(id) {
        warn!(group = %id, error = %err, "Failed to discard group after failed add");
    }
}

fn clear_layers(
    surface: &mut dyn DrawingSurface,
    layers: &mut LayerStore,
    target: &ClearTarget,
) -> SurfaceResult<usize> {
    let names = match target {
        ClearTarget::All => layers.names(),
        ClearTarget::Named(names) => names.clone(),
    };

    let mut cleared = 0;
    for name in &names {
        let Some(entry) = layers.get(name).cloned() else {
            debug!(layer = %name, "Layer not found, nothing to clear");
            continue;
        };

        for (kind, group) in entry.groups() {
            match surface.delete_group(group.id) {
                // Already gone from the surface, e.g. after a style reload
                Ok(()) | Err(SurfaceError::UnknownGroup(_)) => {}
                Err(err) => return Err(err),
            }
            layers.remove_group(name, kind);
        }
        cleared += 1;
    }

    Ok(cleared)
}
