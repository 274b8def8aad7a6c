//! Tool Registry - central registration and dispatch for all tools.
//!
//! The registry is the single source of truth for the tool set. The HTTP
//! gateway dispatches through `call_tool`, and the rmcp router in `router.rs`
//! is built from the same definitions, so both transports always agree on
//! which tools exist. Unknown tool names are never silently defaulted: they
//! fail with `ToolError::NotFound` regardless of the lookup policy, which only
//! governs enum values inside handlers.

use std::sync::Arc;
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;

use super::definitions::{
    AnalyzeCodeTool, CoordinateWorkflowTool, GenerateCodeTool, SelectStyleTool,
};
use super::error::ToolError;
use super::id_gen::CoordinationIdGen;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages the fixed set of workflow tools.
pub struct ToolRegistry {
    config: Arc<Config>,
    id_gen: Arc<dyn CoordinationIdGen>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>, id_gen: Arc<dyn CoordinationIdGen>) -> Self {
        Self { config, id_gen }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            SelectStyleTool::NAME,
            GenerateCodeTool::NAME,
            CoordinateWorkflowTool::NAME,
            AnalyzeCodeTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Both HTTP and STDIO/TCP transports use this to list tools.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            SelectStyleTool::to_tool(),
            GenerateCodeTool::to_tool(),
            CoordinateWorkflowTool::to_tool(),
            AnalyzeCodeTool::to_tool(),
        ]
    }

    /// Dispatch a tool call to the matching handler.
    ///
    /// Returns the handler's raw output value; the transport wraps it into
    /// the response envelope.
    pub fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        match name {
            SelectStyleTool::NAME => SelectStyleTool::call(arguments, &self.config),
            GenerateCodeTool::NAME => GenerateCodeTool::call(arguments, &self.config),
            CoordinateWorkflowTool::NAME => {
                CoordinateWorkflowTool::call(arguments, &self.config, self.id_gen.as_ref())
            }
            AnalyzeCodeTool::NAME => AnalyzeCodeTool::call(arguments),
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::id_gen::SequentialIdGen;

    fn test_registry() -> ToolRegistry {
        ToolRegistry::new(
            Arc::new(Config::default()),
            Arc::new(SequentialIdGen::new()),
        )
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = test_registry();
        let names = registry.tool_names();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"select_practitioner_style"));
        assert!(names.contains(&"generate_code_with_style"));
        assert!(names.contains(&"coordinate_team_workflow"));
        assert!(names.contains(&"analyze_code_quality"));
    }

    #[test]
    fn test_registry_descriptors_are_stable() {
        let first = ToolRegistry::get_all_tools();
        let second = ToolRegistry::get_all_tools();
        assert_eq!(first.len(), 4);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.description, b.description);
        }
    }

    #[test]
    fn test_registry_call_select_style() {
        let registry = test_registry();
        let result = registry.call_tool(
            "select_practitioner_style",
            serde_json::json!({ "task_type": "bug-fix", "team_size": 1 }),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_registry_call_unknown_tool() {
        let registry = test_registry();
        let result = registry.call_tool("unknown", serde_json::json!({}));
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_registry_call_invalid_arguments() {
        let registry = test_registry();
        let result = registry.call_tool("analyze_code_quality", serde_json::json!({}));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
