//! Tool registry for managing the map tools

use crate::schema::ToolDefinition;
use crate::tool::MapTool;
use crate::tools::{
    AddPointsTool, AddPolygonTool, AddRouteTool, ClearLayersTool, FitBoundsTool, PanTool,
    SetStyleTool,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry for managing tools
///
/// Tools are kept in registration order so the catalog handed to a model
/// is stable between calls.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn MapTool>>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Create an empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the seven built-in map tools
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(AddPointsTool::new()));
        registry.register(Arc::new(AddRouteTool::new()));
        registry.register(Arc::new(AddPolygonTool::new()));
        registry.register(Arc::new(PanTool::new()));
        registry.register(Arc::new(FitBoundsTool::new()));
        registry.register(Arc::new(ClearLayersTool::new()));
        registry.register(Arc::new(SetStyleTool::new()));
        registry
    }

    /// Register a tool
    ///
    /// A tool with the same name replaces the earlier one in place.
    pub fn register(&mut self, tool: Arc<dyn MapTool>) {
        match self.index.get(tool.name()) {
            Some(&slot) => self.tools[slot] = tool,
            None => {
                self.index.insert(tool.name(), self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn MapTool>> {
        self.index.get(name).map(|&slot| Arc::clone(&self.tools[slot]))
    }

    /// List all registered tools in registration order
    pub fn list_tools(&self) -> Vec<Arc<dyn MapTool>> {
        self.tools.clone()
    }

    /// Build the definitions to send to the model
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.tools.iter().map(|tool| tool.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::MapCommand;
    use crate::schema::InputSchema;
    use mapkit_core::{ParamError, Params};

    struct StubTool {
        description: &'static str,
    }

    impl MapTool for StubTool {
        fn name(&self) -> &'static str {
            "set_map_style"
        }

        fn description(&self) -> &'static str {
            self.description
        }

        fn input_schema(&self) -> InputSchema {
            InputSchema::object(Vec::<(&str, crate::Property)>::new(), &[])
        }

        fn plan(&self, _params: &Params<'_>) -> Result<MapCommand, ParamError> {
            Ok(MapCommand::SetStyle {
                style_url: "stub".to_string(),
            })
        }
    }

    #[test]
    fn test_builtin_order() {
        let registry = ToolRegistry::builtin();
        let names: Vec<_> = registry.list_tools().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "add_points_to_map",
                "add_route_to_map",
                "add_polygon_to_map",
                "pan_map_to_location",
                "fit_map_to_bounds",
                "clear_map_layers",
                "set_map_style",
            ]
        );
    }

    #[test]
    fn test_get() {
        let registry = ToolRegistry::builtin();
        assert!(registry.get("pan_map_to_location").is_some());
        assert!(registry.get("teleport").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = ToolRegistry::builtin();
        registry.register(Arc::new(StubTool {
            description: "stub",
        }));

        assert_eq!(registry.len(), 7);
        let last = registry.list_tools().pop().unwrap();
        assert_eq!(last.description(), "stub");
        assert_eq!(
            registry.get("set_map_style").unwrap().description(),
            "stub"
        );
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.definitions().is_empty());
    }
}
