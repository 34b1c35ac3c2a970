//! Map tools for LLM agents
//!
//! This crate exposes a fixed catalog of map-manipulation tools (markers,
//! routes, polygons, camera moves, layer clearing, style changes) that a
//! language model can discover and call by name. [`MapToolProvider`] is the
//! entry point: it hands out the catalog, validates incoming calls, and
//! forwards them to a [`DrawingSurface`](mapkit_core::DrawingSurface) running
//! on its own thread.

pub mod catalog;
pub mod command;
pub mod layers;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod tool;
pub mod tools;
mod worker;

pub use catalog::tools_for_llm;
pub use command::MapCommand;
pub use layers::{LayerStore, LayerSummary};
pub use provider::{MapToolProvider, ToolCall, ToolProvider};
pub use registry::ToolRegistry;
pub use schema::{InputSchema, Property, PropertyType, ToolDefinition};
pub use tool::MapTool;
