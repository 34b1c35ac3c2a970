//! The tool catalog advertised to models

use crate::registry::ToolRegistry;
use crate::schema::ToolDefinition;

/// Definitions of every built-in map tool
///
/// Pure and deterministic: each call builds a fresh list with the same
/// seven definitions in the same order, so callers may mutate the result.
pub fn tools_for_llm() -> Vec<ToolDefinition> {
    ToolRegistry::builtin().definitions()
}
