//! Geographic primitives

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A position in degrees, longitude first as in GeoJSON
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees
    pub lng: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl LngLat {
    /// Create a position from longitude and latitude
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Axis-aligned bounding box over a set of positions
///
/// The box is computed from component-wise minima and maxima, so the order
/// of the input positions does not matter.
///
/// # Example
///
/// ```
/// use mapkit_core::{BoundingBox, LngLat};
///
/// let points = [LngLat::new(2.0, 2.0), LngLat::new(0.0, 0.0)];
/// let bounds = BoundingBox::from_points(&points).unwrap();
/// assert_eq!(bounds.min, LngLat::new(0.0, 0.0));
/// assert_eq!(bounds.max, LngLat::new(2.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// South-west corner
    pub min: LngLat,
    /// North-east corner
    pub max: LngLat,
}

impl BoundingBox {
    /// Compute the bounding box of the given positions
    ///
    /// Returns `None` for an empty input.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LngLat>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let bounds = iter.fold(
            BoundingBox {
                min: first,
                max: first,
            },
            |acc, p| BoundingBox {
                min: LngLat::new(acc.min.lng.min(p.lng), acc.min.lat.min(p.lat)),
                max: LngLat::new(acc.max.lng.max(p.lng), acc.max.lat.max(p.lat)),
            },
        );
        Some(bounds)
    }

    /// Center of the box
    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.min.lng + self.max.lng) / 2.0,
            (self.min.lat + self.max.lat) / 2.0,
        )
    }

    /// Longitude extent in degrees
    pub fn width(&self) -> f64 {
        self.max.lng - self.min.lng
    }

    /// Latitude extent in degrees
    pub fn height(&self) -> f64 {
        self.max.lat - self.min.lat
    }
}

/// Camera state of a map view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    /// Center of the view
    pub center: LngLat,
    /// Zoom level
    pub zoom: f64,
}

impl CameraPosition {
    /// Create a camera position
    pub const fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom }
    }
}

impl Default for CameraPosition {
    fn default() -> Self {
        Self {
            center: LngLat::default(),
            zoom: 1.0,
        }
    }
}

/// How a camera move is performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraAnimation {
    /// Jump to the target without animation
    Immediate,
    /// Ease to the target over the given duration
    Animated {
        /// Animation length
        duration: Duration,
    },
}

impl CameraAnimation {
    /// Build from an `animated` flag and a duration
    pub fn from_flag(animated: bool, duration: Duration) -> Self {
        if animated {
            CameraAnimation::Animated { duration }
        } else {
            CameraAnimation::Immediate
        }
    }
}
