//! Core abstractions for mapkit-rs
//!
//! This crate defines the vocabulary shared by the tool layer and the
//! rendering backends: geographic primitives, colors, loosely-typed tool
//! parameters, the uniform [`ToolOutcome`], and the [`DrawingSurface`] trait
//! that map backends implement.

pub mod color;
pub mod error;
pub mod geo;
pub mod memory;
pub mod outcome;
pub mod params;
pub mod surface;

pub use color::Color;
pub use error::{Error, ParamError, Result, SurfaceError};
pub use geo::{BoundingBox, CameraAnimation, CameraPosition, LngLat};
pub use memory::{MemoryGroup, MemoryState, MemorySurface};
pub use outcome::{ErrorCode, ToolOutcome};
pub use params::Params;
pub use surface::{
    DrawingSurface, FeatureKind, GroupId, LineStyle, Marker, Polygon, PolygonStyle, Polyline,
    SurfaceResult,
};
