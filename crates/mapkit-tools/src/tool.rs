//! Map tool trait definition

use crate::command::MapCommand;
use crate::schema::{InputSchema, ToolDefinition};
use mapkit_core::{ParamError, Params};

/// Trait for map tools that models can call
///
/// A tool turns untyped call parameters into a [`MapCommand`]. It never
/// touches the drawing surface itself: coercion happens on the caller's
/// side, the command is applied later on the surface thread.
pub trait MapTool: Send + Sync {
    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry and match the name in ToolDefinition
    fn name(&self) -> &'static str;

    /// Get the tool's description
    ///
    /// This description helps the model understand when to use this tool
    fn description(&self) -> &'static str;

    /// Get the tool's input schema
    ///
    /// Describes the parameters this tool expects, including their defaults.
    fn input_schema(&self) -> InputSchema;

    /// Coerce call parameters into a command
    ///
    /// Fails on the first missing or malformed parameter.
    fn plan(&self, params: &Params<'_>) -> Result<MapCommand, ParamError>;

    /// Full definition for the model provider
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.input_schema())
    }
}
