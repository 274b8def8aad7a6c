//! Team workflow coordination tool.
//!
//! Builds a phase plan for a named workflow, round-robins team members across
//! the phases, and assesses risks from a few boolean conditions. All output is
//! derived from a static workflow table plus the arguments; the only injected
//! capability is the coordination-id generator.

use futures::FutureExt;
use regex::Regex;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, LazyLock};
use tracing::{info, instrument};

use super::common::{json_content, mcp_error, parse_params};
use crate::core::config::{Config, LookupPolicy};
use crate::domains::tools::ToolError;
use crate::domains::tools::id_gen::CoordinationIdGen;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the workflow coordination tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CoordinateWorkflowParams {
    /// Workflow to coordinate: "feature-development", "bug-fix", "refactor",
    /// "code-review", or "deployment".
    #[schemars(
        description = "Workflow type: feature-development, bug-fix, refactor, code-review, deployment"
    )]
    pub workflow: String,

    /// Names of the team members to distribute tasks across.
    #[serde(default)]
    #[schemars(description = "List of team member names")]
    pub team_members: Vec<String>,

    /// Priority of the work: "low", "medium", "high", or "critical".
    #[serde(default = "default_priority")]
    #[schemars(description = "Priority: low, medium, high, critical (default: medium)")]
    pub priority: String,
}

fn default_priority() -> String {
    "medium".to_string()
}

const PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];

// ============================================================================
// Workflow Templates
// ============================================================================

struct Phase {
    name: &'static str,
    duration: &'static str,
    activities: &'static [&'static str],
}

struct WorkflowTemplate {
    workflow: &'static str,
    phases: &'static [Phase],
    practitioner_styles: &'static [&'static str],
    communication: &'static str,
    deliverables: &'static [&'static str],
}

/// `feature-development` is also the fallback entry under the permissive policy.
const FALLBACK_WORKFLOW: &str = "feature-development";

static WORKFLOW_TEMPLATES: &[WorkflowTemplate] = &[
    WorkflowTemplate {
        workflow: "feature-development",
        phases: &[
            Phase {
                name: "Planning",
                duration: "1-2 days",
                activities: &["Requirements analysis", "Technical design", "Task breakdown"],
            },
            Phase {
                name: "Development",
                duration: "5-10 days",
                activities: &["Implementation", "Unit testing", "Integration"],
            },
            Phase {
                name: "Review",
                duration: "1-2 days",
                activities: &["Code review", "Testing", "Documentation"],
            },
            Phase {
                name: "Deployment",
                duration: "1 day",
                activities: &["Deployment", "Monitoring", "Rollback plan"],
            },
        ],
        practitioner_styles: &["uncle-bob", "martin-fowler", "kent-beck"],
        communication: "daily",
        deliverables: &["Feature specification", "Implementation", "Tests", "Documentation"],
    },
    WorkflowTemplate {
        workflow: "bug-fix",
        phases: &[
            Phase {
                name: "Triage",
                duration: "2-4 hours",
                activities: &["Bug reproduction", "Severity assessment", "Assignment"],
            },
            Phase {
                name: "Investigation",
                duration: "4-8 hours",
                activities: &["Root cause analysis", "Impact assessment"],
            },
            Phase {
                name: "Fix",
                duration: "1-3 days",
                activities: &["Implementation", "Testing", "Verification"],
            },
            Phase {
                name: "Validation",
                duration: "1-2 days",
                activities: &["QA testing", "UAT", "Deployment"],
            },
        ],
        practitioner_styles: &["kent-beck", "martin-fowler"],
        communication: "as-needed",
        deliverables: &["Bug report", "Fix implementation", "Test cases", "Verification results"],
    },
    WorkflowTemplate {
        workflow: "refactor",
        phases: &[
            Phase {
                name: "Analysis",
                duration: "1-2 days",
                activities: &["Code analysis", "Smell detection", "Refactoring plan"],
            },
            Phase {
                name: "Preparation",
                duration: "1 day",
                activities: &["Test coverage", "Safety nets", "Branch strategy"],
            },
            Phase {
                name: "Refactoring",
                duration: "3-5 days",
                activities: &["Incremental changes", "Continuous testing", "Review"],
            },
            Phase {
                name: "Validation",
                duration: "1-2 days",
                activities: &["Regression testing", "Performance testing", "Documentation"],
            },
        ],
        practitioner_styles: &["martin-fowler", "kent-beck", "uncle-bob"],
        communication: "daily",
        deliverables: &["Refactoring plan", "Refactored code", "Test results"],
    },
    WorkflowTemplate {
        workflow: "code-review",
        phases: &[
            Phase {
                name: "Preparation",
                duration: "1 hour",
                activities: &["Code formatting", "Self-review", "Documentation"],
            },
            Phase {
                name: "Review",
                duration: "2-4 hours",
                activities: &["Code analysis", "Feedback", "Discussion"],
            },
            Phase {
                name: "Revision",
                duration: "1-2 hours",
                activities: &["Address feedback", "Re-review", "Approval"],
            },
            Phase {
                name: "Merge",
                duration: "1 hour",
                activities: &["Final checks", "Merge", "Cleanup"],
            },
        ],
        practitioner_styles: &["uncle-bob", "martin-fowler"],
        communication: "synchronous",
        deliverables: &["Review comments", "Approved code", "Merge commit"],
    },
    WorkflowTemplate {
        workflow: "deployment",
        phases: &[
            Phase {
                name: "Pre-deployment",
                duration: "1-2 hours",
                activities: &["Checklist review", "Environment preparation", "Backup"],
            },
            Phase {
                name: "Deployment",
                duration: "1-3 hours",
                activities: &["Code deployment", "Database migration", "Configuration"],
            },
            Phase {
                name: "Verification",
                duration: "1-2 hours",
                activities: &["Smoke tests", "Health checks", "Monitoring"],
            },
            Phase {
                name: "Post-deployment",
                duration: "1 hour",
                activities: &["Documentation", "Notification", "Cleanup"],
            },
        ],
        practitioner_styles: &["kelsey-hightower", "martin-fowler"],
        communication: "real-time",
        deliverables: &["Deployment plan", "Deployed application", "Deployment report"],
    },
];

fn lookup_workflow(
    workflow: &str,
    policy: LookupPolicy,
) -> Result<&'static WorkflowTemplate, ToolError> {
    match WORKFLOW_TEMPLATES.iter().find(|t| t.workflow == workflow) {
        Some(template) => Ok(template),
        None => match policy {
            LookupPolicy::Strict => Err(ToolError::invalid_arguments(format!(
                "Unknown workflow: {}. Expected one of: feature-development, bug-fix, \
                 refactor, code-review, deployment",
                workflow
            ))),
            LookupPolicy::Permissive => Ok(WORKFLOW_TEMPLATES
                .iter()
                .find(|t| t.workflow == FALLBACK_WORKFLOW)
                .unwrap_or(&WORKFLOW_TEMPLATES[0])),
        },
    }
}

// ============================================================================
// Duration Parsing
// ============================================================================

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:-(\d+))?\s*(hours?|days?)").unwrap());

/// Parse duration strings like "1-2 days" or "4-8 hours" into estimated hours.
///
/// Ranges average out; a day counts as 8 working hours. Unparseable input
/// falls back to a one-day estimate.
fn parse_hours(duration: &str) -> f64 {
    let Some(caps) = DURATION_RE.captures(duration) else {
        return 8.0;
    };

    let min: f64 = caps[1].parse().unwrap_or(0.0);
    let max: f64 = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(min);
    let hours = (min + max) / 2.0;

    if caps[3].starts_with("day") {
        hours * 8.0
    } else {
        hours
    }
}

fn total_hours(template: &WorkflowTemplate) -> f64 {
    template.phases.iter().map(|p| parse_hours(p.duration)).sum()
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Workflow coordination tool - plans phases, assignments, and risks.
pub struct CoordinateWorkflowTool;

impl CoordinateWorkflowTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "coordinate_team_workflow";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Coordinate team workflows and task distribution";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(workflow = %params.workflow))]
    pub fn execute(
        params: &CoordinateWorkflowParams,
        config: &Config,
        id_gen: &dyn CoordinationIdGen,
    ) -> Result<serde_json::Value, ToolError> {
        info!(
            "Coordinating {} workflow for {} members",
            params.workflow,
            params.team_members.len()
        );

        let template = lookup_workflow(&params.workflow, config.tools.lookup_policy)?;
        let priority = Self::resolve_priority(&params.priority, config.tools.lookup_policy)?;

        let timeline: Vec<serde_json::Value> = template
            .phases
            .iter()
            .map(|phase| {
                json!({
                    "phase": phase.name,
                    "duration": phase.duration,
                    "activities": phase.activities,
                    "milestones": [
                        format!("{} completion", phase.name),
                        format!("{} review", phase.name),
                    ],
                })
            })
            .collect();

        Ok(json!({
            "coordination_id": id_gen.next_id(),
            "workflow": params.workflow,
            "priority": priority,
            "team": {
                "size": params.team_members.len(),
                "members": params.team_members,
            },
            "plan": {
                "phases": template.phases.iter().map(|p| p.name).collect::<Vec<_>>(),
                "recommended_styles": template.practitioner_styles,
                "communication": format!("{} check-ins", template.communication),
                "deliverables": template.deliverables,
            },
            "timeline": timeline,
            "task_assignments": Self::distribute_tasks(template, &params.team_members, priority),
            "risks": Self::assess_risks(&params.workflow, params.team_members.len(), priority),
            "recommendations": Self::recommendations(&params.workflow, params.team_members.len()),
            "next_steps": [
                "Assign team members to phases",
                "Set up communication channels",
                "Schedule regular check-ins",
                "Prepare development environment",
            ],
        }))
    }

    fn resolve_priority(priority: &str, policy: LookupPolicy) -> Result<&'static str, ToolError> {
        match PRIORITIES.iter().find(|p| **p == priority) {
            Some(p) => Ok(p),
            None => match policy {
                LookupPolicy::Strict => Err(ToolError::invalid_arguments(format!(
                    "Unknown priority: {}. Expected one of: low, medium, high, critical",
                    priority
                ))),
                LookupPolicy::Permissive => Ok("medium"),
            },
        }
    }

    /// Round-robin phases across team members. An empty team collapses to a
    /// single unassigned aggregate task.
    fn distribute_tasks(
        template: &WorkflowTemplate,
        team_members: &[String],
        priority: &str,
    ) -> Vec<serde_json::Value> {
        if team_members.is_empty() {
            return vec![json!({
                "assignee": "Unassigned",
                "task": "Complete workflow tasks",
                "priority": priority,
                "estimated_hours": total_hours(template),
                "dependencies": [],
                "practitioner_style": template.practitioner_styles[0],
            })];
        }

        template
            .phases
            .iter()
            .enumerate()
            .map(|(index, phase)| {
                let assignee = &team_members[index % team_members.len()];
                let style =
                    template.practitioner_styles[index % template.practitioner_styles.len()];
                let dependencies: Vec<&str> = if index > 0 {
                    vec![template.phases[index - 1].name]
                } else {
                    vec![]
                };

                json!({
                    "assignee": assignee,
                    "task": format!("{}: {}", phase.name, phase.activities.join(", ")),
                    "priority": priority,
                    "estimated_hours": parse_hours(phase.duration),
                    "dependencies": dependencies,
                    "practitioner_style": style,
                })
            })
            .collect()
    }

    fn assess_risks(workflow: &str, team_size: usize, priority: &str) -> Vec<serde_json::Value> {
        let mut risks = Vec::new();

        if team_size < 2 {
            risks.push(json!({
                "description": "Single point of failure with one team member",
                "probability": "medium",
                "impact": "high",
                "mitigation": "Ensure knowledge sharing and documentation",
            }));
        }

        if priority == "critical" {
            risks.push(json!({
                "description": "Quality may suffer under time pressure",
                "probability": "high",
                "impact": "medium",
                "mitigation": "Implement additional review checkpoints",
            }));
        }

        if workflow == "deployment" {
            risks.push(json!({
                "description": "Deployment failure could impact production",
                "probability": "low",
                "impact": "high",
                "mitigation": "Implement rollback procedures and monitoring",
            }));
        }

        if risks.is_empty() {
            risks.push(json!({
                "description": "Low risk - team size and priority are well balanced",
                "probability": "low",
                "impact": "low",
                "mitigation": "Continue with standard practices",
            }));
        }

        risks
    }

    fn recommendations(workflow: &str, team_size: usize) -> Vec<&'static str> {
        let mut recs = vec![
            "Establish clear communication channels",
            "Set up continuous integration",
            "Define done criteria",
            "Plan regular retrospectives",
        ];

        if team_size > 3 {
            recs.push("Consider splitting into smaller sub-teams");
            recs.push("Implement more frequent standups");
        }

        if workflow == "feature-development" {
            recs.push("Use feature flags for safe deployment");
            recs.push("Plan A/B testing strategy");
        }

        recs
    }

    /// Dispatch entry point used by the registry: raw arguments in, value out.
    pub fn call(
        arguments: serde_json::Value,
        config: &Config,
        id_gen: &dyn CoordinationIdGen,
    ) -> Result<serde_json::Value, ToolError> {
        let params: CoordinateWorkflowParams = parse_params(arguments)?;
        Self::execute(&params, config, id_gen)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CoordinateWorkflowParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(
        config: Arc<Config>,
        id_gen: Arc<dyn CoordinationIdGen>,
    ) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            let id_gen = id_gen.clone();
            async move {
                let value = Self::call(serde_json::Value::Object(args), &config, id_gen.as_ref())
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
    use crate::domains::tools::id_gen::SequentialIdGen;

    fn strict_config() -> Config {
        Config::default()
    }

    fn params(workflow: &str, members: &[&str], priority: &str) -> CoordinateWorkflowParams {
        CoordinateWorkflowParams {
            workflow: workflow.to_string(),
            team_members: members.iter().map(|m| m.to_string()).collect(),
            priority: priority.to_string(),
        }
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours("1-2 days"), 12.0);
        assert_eq!(parse_hours("2-4 hours"), 3.0);
        assert_eq!(parse_hours("1 day"), 8.0);
        assert_eq!(parse_hours("5-10 days"), 60.0);
        assert_eq!(parse_hours("1 hour"), 1.0);
        assert_eq!(parse_hours("soon"), 8.0);
    }

    #[test]
    fn test_round_robin_assignment() {
        let ids = SequentialIdGen::new();
        let value = CoordinateWorkflowTool::execute(
            &params("feature-development", &["Alice", "Bob"], "medium"),
            &strict_config(),
            &ids,
        )
        .unwrap();

        let assignments = value["task_assignments"].as_array().unwrap();
        assert_eq!(assignments.len(), 4);
        assert_eq!(assignments[0]["assignee"], "Alice");
        assert_eq!(assignments[1]["assignee"], "Bob");
        assert_eq!(assignments[2]["assignee"], "Alice");
        assert_eq!(assignments[3]["assignee"], "Bob");

        // First phase has no dependency, later phases depend on the previous one
        assert!(assignments[0]["dependencies"].as_array().unwrap().is_empty());
        assert_eq!(assignments[1]["dependencies"][0], "Planning");
    }

    #[test]
    fn test_deployment_single_member_flags_single_point_of_failure() {
        let ids = SequentialIdGen::new();
        let value = CoordinateWorkflowTool::execute(
            &params("deployment", &["A"], "medium"),
            &strict_config(),
            &ids,
        )
        .unwrap();

        let risks = value["risks"].as_array().unwrap();
        assert!(risks.iter().any(|r| {
            r["description"]
                .as_str()
                .unwrap()
                .contains("Single point of failure")
        }));
        assert!(risks.iter().any(|r| {
            r["description"].as_str().unwrap().contains("production")
        }));
    }

    #[test]
    fn test_balanced_team_reports_low_risk() {
        let ids = SequentialIdGen::new();
        let value = CoordinateWorkflowTool::execute(
            &params("refactor", &["A", "B", "C"], "medium"),
            &strict_config(),
            &ids,
        )
        .unwrap();

        let risks = value["risks"].as_array().unwrap();
        assert_eq!(risks.len(), 1);
        assert!(risks[0]["description"].as_str().unwrap().contains("Low risk"));
    }

    #[test]
    fn test_critical_priority_risk() {
        let ids = SequentialIdGen::new();
        let value = CoordinateWorkflowTool::execute(
            &params("bug-fix", &["A", "B"], "critical"),
            &strict_config(),
            &ids,
        )
        .unwrap();

        let risks = value["risks"].as_array().unwrap();
        assert!(risks.iter().any(|r| {
            r["description"].as_str().unwrap().contains("time pressure")
        }));
    }

    #[test]
    fn test_empty_team_gets_unassigned_aggregate_task() {
        let ids = SequentialIdGen::new();
        let value = CoordinateWorkflowTool::execute(
            &params("code-review", &[], "low"),
            &strict_config(),
            &ids,
        )
        .unwrap();

        let assignments = value["task_assignments"].as_array().unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0]["assignee"], "Unassigned");
        // 1h + 3h + 1.5h + 1h
        assert_eq!(assignments[0]["estimated_hours"], 6.5);
    }

    #[test]
    fn test_coordination_ids_are_sequential() {
        let ids = SequentialIdGen::new();
        let config = strict_config();
        let p = params("bug-fix", &["A"], "medium");

        let first = CoordinateWorkflowTool::execute(&p, &config, &ids).unwrap();
        let second = CoordinateWorkflowTool::execute(&p, &config, &ids).unwrap();
        assert_eq!(first["coordination_id"], "coord-1");
        assert_eq!(second["coordination_id"], "coord-2");
    }

    #[test]
    fn test_unknown_workflow_strict_fails() {
        let ids = SequentialIdGen::new();
        let result = CoordinateWorkflowTool::execute(
            &params("yak-shaving", &[], "medium"),
            &strict_config(),
            &ids,
        );
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_large_team_gets_extra_recommendations() {
        let ids = SequentialIdGen::new();
        let value = CoordinateWorkflowTool::execute(
            &params("feature-development", &["A", "B", "C", "D"], "high"),
            &strict_config(),
            &ids,
        )
        .unwrap();

        let recs = value["recommendations"].as_array().unwrap();
        assert!(recs.iter().any(|r| {
            r.as_str().unwrap().contains("sub-teams")
        }));
        assert!(recs.iter().any(|r| {
            r.as_str().unwrap().contains("feature flags")
        }));
    }
}
