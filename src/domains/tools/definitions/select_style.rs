//! Practitioner style selection tool.
//!
//! Recommends a practitioner style for a task based on a fixed rule table.
//! The table is static data: same input, same recommendation, every time.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};

use super::common::{json_content, mcp_error, parse_params};
use crate::core::config::{Config, LookupPolicy};
use crate::domains::tools::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the style selection tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectStyleParams {
    /// Type of task: "feature", "bug-fix", "refactor", "data-processing",
    /// or "infrastructure".
    #[schemars(
        description = "Task type: feature, bug-fix, refactor, data-processing, infrastructure"
    )]
    pub task_type: String,

    /// Additional context about the task.
    #[serde(default)]
    #[schemars(description = "Additional context about the task")]
    pub context: Option<String>,

    /// Number of team members working on the task.
    #[serde(default)]
    #[schemars(description = "Number of team members")]
    pub team_size: Option<u32>,
}

// ============================================================================
// Style Rules
// ============================================================================

/// One entry of the style rule table.
struct StyleRule {
    task_type: &'static str,
    practitioner: &'static str,
    rationale: &'static str,
    principles: &'static [&'static str],
    guidance: &'static str,
    confidence: f64,
}

static STYLE_RULES: &[StyleRule] = &[
    StyleRule {
        task_type: "feature",
        practitioner: "uncle-bob",
        rationale: "New features benefit from clean code principles for maintainability",
        principles: &[
            "Single Responsibility",
            "Open/Closed Principle",
            "Clean Architecture",
        ],
        guidance: "Focus on clear interfaces, dependency injection, and comprehensive testing",
        confidence: 0.85,
    },
    StyleRule {
        task_type: "bug-fix",
        practitioner: "kent-beck",
        rationale: "Bug fixes require a test-driven approach for confidence and regression prevention",
        principles: &["Test-Driven Development", "Simple Design", "Refactoring"],
        guidance: "Write failing tests first, make them pass, then refactor safely",
        confidence: 0.90,
    },
    StyleRule {
        task_type: "refactor",
        practitioner: "martin-fowler",
        rationale: "Refactorings benefit from a systematic evolutionary approach",
        principles: &[
            "Evolutionary Design",
            "Continuous Refactoring",
            "Code Smells Detection",
        ],
        guidance: "Use incremental changes with comprehensive test coverage",
        confidence: 0.95,
    },
    StyleRule {
        task_type: "data-processing",
        practitioner: "jessica-kerr",
        rationale: "Data processing benefits from functional programming principles for reliability",
        principles: &["Pure Functions", "Immutability", "Composability"],
        guidance: "Use immutable data structures and function composition",
        confidence: 0.88,
    },
    StyleRule {
        task_type: "infrastructure",
        practitioner: "kelsey-hightower",
        rationale: "Infrastructure work requires cloud-native and production-ready approaches",
        principles: &["Cloud-Native Design", "Operational Excellence", "Automation"],
        guidance: "Focus on scalability, monitoring, and deployment automation",
        confidence: 0.92,
    },
];

/// Fallback entry used under the permissive lookup policy.
static FALLBACK_RULE: StyleRule = StyleRule {
    task_type: "default",
    practitioner: "martin-fowler",
    rationale: "Default to evolutionary design for unknown contexts",
    principles: &["Evolutionary Design", "Continuous Improvement"],
    guidance: "Start simple, evolve based on feedback",
    confidence: 0.65,
};

fn lookup_rule(task_type: &str, policy: LookupPolicy) -> Result<&'static StyleRule, ToolError> {
    match STYLE_RULES.iter().find(|r| r.task_type == task_type) {
        Some(rule) => Ok(rule),
        None => match policy {
            LookupPolicy::Strict => Err(ToolError::invalid_arguments(format!(
                "Unknown task type: {}. Expected one of: feature, bug-fix, refactor, \
                 data-processing, infrastructure",
                task_type
            ))),
            LookupPolicy::Permissive => Ok(&FALLBACK_RULE),
        },
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Style selection tool - recommends a practitioner style for a task.
pub struct SelectStyleTool;

impl SelectStyleTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "select_practitioner_style";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Auto-select the best practitioner style based on task context";

    /// Execute the tool logic. Pure function over the params and policy.
    #[instrument(skip_all, fields(task_type = %params.task_type))]
    pub fn execute(
        params: &SelectStyleParams,
        config: &Config,
    ) -> Result<serde_json::Value, ToolError> {
        info!("Selecting style for task type: {}", params.task_type);

        let rule = lookup_rule(&params.task_type, config.tools.lookup_policy)?;
        let team_size = params.team_size.unwrap_or(1);

        let team_guidance = if team_size > 1 {
            "Foster pair programming, conduct thorough code reviews, ensure knowledge sharing"
        } else {
            "Focus on clear documentation and self-explaining code"
        };

        Ok(json!({
            "task": {
                "task_type": params.task_type,
                "context": params.context.as_deref().unwrap_or("No additional context provided"),
                "team_size": team_size,
            },
            "recommendation": {
                "practitioner": rule.practitioner,
                "rationale": rule.rationale,
                "principles": rule.principles,
                "implementation_guidance": rule.guidance,
                "confidence": rule.confidence,
            },
            "team_guidance": team_guidance,
        }))
    }

    /// Dispatch entry point used by the registry: raw arguments in, value out.
    pub fn call(
        arguments: serde_json::Value,
        config: &Config,
    ) -> Result<serde_json::Value, ToolError> {
        let params: SelectStyleParams = parse_params(arguments)?;
        Self::execute(&params, config)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SelectStyleParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let value = Self::call(serde_json::Value::Object(args), &config)
                    .map_err(mcp_error)?;
                json_content(&value)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strict_config() -> Config {
        Config::default()
    }

    fn permissive_config() -> Config {
        let mut config = Config::default();
        config.tools.lookup_policy = LookupPolicy::Permissive;
        config
    }

    #[test]
    fn test_bug_fix_solo_team() {
        let params = SelectStyleParams {
            task_type: "bug-fix".to_string(),
            context: None,
            team_size: Some(1),
        };

        let value = SelectStyleTool::execute(&params, &strict_config()).unwrap();
        assert_eq!(value["recommendation"]["practitioner"], "kent-beck");
        let principles = value["recommendation"]["principles"].as_array().unwrap();
        assert!(!principles.is_empty());
        assert_eq!(
            value["team_guidance"],
            "Focus on clear documentation and self-explaining code"
        );
    }

    #[test]
    fn test_team_guidance_for_larger_teams() {
        let params = SelectStyleParams {
            task_type: "feature".to_string(),
            context: Some("checkout flow".to_string()),
            team_size: Some(4),
        };

        let value = SelectStyleTool::execute(&params, &strict_config()).unwrap();
        assert_eq!(value["recommendation"]["practitioner"], "uncle-bob");
        let guidance = value["team_guidance"].as_str().unwrap();
        assert!(guidance.contains("pair programming"));
    }

    #[test]
    fn test_unknown_task_type_strict_fails() {
        let params = SelectStyleParams {
            task_type: "yak-shaving".to_string(),
            context: None,
            team_size: None,
        };

        let result = SelectStyleTool::execute(&params, &strict_config());
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_unknown_task_type_permissive_falls_back() {
        let params = SelectStyleParams {
            task_type: "yak-shaving".to_string(),
            context: None,
            team_size: None,
        };

        let value = SelectStyleTool::execute(&params, &permissive_config()).unwrap();
        assert_eq!(value["recommendation"]["practitioner"], "martin-fowler");
    }

    #[test]
    fn test_call_rejects_missing_task_type() {
        let result = SelectStyleTool::call(serde_json::json!({}), &strict_config());
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_missing_team_size_defaults_to_one() {
        let value = SelectStyleTool::call(
            serde_json::json!({ "task_type": "refactor" }),
            &strict_config(),
        )
        .unwrap();
        assert_eq!(value["task"]["team_size"], 1);
    }
}
