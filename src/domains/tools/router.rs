//! Tool Router - builds the rmcp ToolRouter from the definitions.
//!
//! Used by the STDIO/TCP transports. Each tool knows how to create its own
//! route; adding a tool means adding one `with_route` line here and one
//! registry entry, nothing else.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;

use super::definitions::{
    AnalyzeCodeTool, CoordinateWorkflowTool, GenerateCodeTool, SelectStyleTool,
};
use super::id_gen::CoordinationIdGen;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(
    config: Arc<Config>,
    id_gen: Arc<dyn CoordinationIdGen>,
) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(SelectStyleTool::create_route(config.clone()))
        .with_route(GenerateCodeTool::create_route(config.clone()))
        .with_route(CoordinateWorkflowTool::create_route(config, id_gen))
        .with_route(AnalyzeCodeTool::create_route())
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::domains::tools::id_gen::SequentialIdGen;

    struct TestServer {}

    fn deps() -> (Arc<Config>, Arc<dyn CoordinationIdGen>) {
        (
            Arc::new(Config::default()),
            Arc::new(SequentialIdGen::new()),
        )
    }

    #[test]
    fn test_build_router() {
        let (config, id_gen) = deps();
        let router: ToolRouter<TestServer> = build_tool_router(config, id_gen);
        let tools = router.list_all();
        assert_eq!(tools.len(), 4);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"select_practitioner_style"));
        assert!(names.contains(&"generate_code_with_style"));
        assert!(names.contains(&"coordinate_team_workflow"));
        assert!(names.contains(&"analyze_code_quality"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Registry and router must expose the same tool set
        let (config, id_gen) = deps();
        let registry = ToolRegistry::new(config.clone(), id_gen.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(config, id_gen);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
