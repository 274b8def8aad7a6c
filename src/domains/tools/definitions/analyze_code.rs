//! Code quality analysis tool.
//!
//! Computes regex-count metrics over a code snippet and scores it from five
//! practitioner perspectives. The heuristics are intentionally shallow - token
//! counting, not parsing - and fully deterministic: identical input yields
//! identical metrics and score.

use futures::FutureExt;
use regex::Regex;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::Tool,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::LazyLock;
use tracing::{info, instrument};

use super::common::{json_content, mcp_error, parse_params};
use crate::domains::tools::ToolError;

/// Complexity estimates are capped; beyond this the number stops meaning much.
const MAX_COMPLEXITY: usize = 15;

/// Echoed code is truncated to keep responses small.
const CODE_ECHO_LIMIT: usize = 200;

// Function definitions only: the `function` keyword, arrow functions, and the
// Rust/Python equivalents. Bare call sites deliberately do not count.
static FUNCTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"function\s|=>|\bfn\s|\bdef\s").unwrap());

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"class\s+\w+").unwrap());

static BRANCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bif\b|\belse\b|\bswitch\b|\bcase\b|\bfor\b|\bwhile\b|\bcatch\b|\bmatch\b|&&|\|\||\?")
        .unwrap()
});

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the code analysis tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeCodeParams {
    /// The code snippet to analyze.
    #[schemars(description = "Code to analyze")]
    pub code: String,

    /// Programming language of the snippet. Defaults to "javascript".
    #[serde(default = "default_language")]
    #[schemars(description = "Programming language (default: javascript)")]
    pub language: String,

    /// Areas to focus the analysis on.
    #[serde(default = "default_focus_areas")]
    #[schemars(description = "Areas to focus analysis on")]
    pub focus_areas: Vec<String>,
}

fn default_language() -> String {
    "javascript".to_string()
}

fn default_focus_areas() -> Vec<String> {
    vec![
        "clean-code".to_string(),
        "maintainability".to_string(),
        "performance".to_string(),
    ]
}

// ============================================================================
// Metrics
// ============================================================================

struct Metrics {
    lines: usize,
    functions: usize,
    classes: usize,
    complexity: usize,
    tests_present: bool,
}

fn compute_metrics(code: &str) -> Metrics {
    let branches = BRANCH_RE.find_iter(code).count();

    Metrics {
        lines: code.lines().count().max(1),
        functions: FUNCTION_RE.find_iter(code).count(),
        classes: CLASS_RE.find_iter(code).count(),
        complexity: (1 + branches).min(MAX_COMPLEXITY),
        tests_present: code.contains("test") || code.contains("spec") || code.contains("describe"),
    }
}

// ============================================================================
// Practitioner Perspectives
// ============================================================================

fn analyze_clean_code(code: &str, metrics: &Metrics) -> (i64, serde_json::Value) {
    let mut issues = Vec::new();
    let mut strengths = Vec::new();

    if metrics.functions == 0 {
        issues.push("No functions detected - consider better structure");
    }
    if code.contains("var ") {
        issues.push("Uses 'var' - prefer 'const' or 'let'");
    }
    if code.len() > 500 && metrics.functions < 3 {
        issues.push("Large code block - consider extracting functions");
    }

    if code.contains("const ") {
        strengths.push("Uses const declarations");
    }
    if code.contains("// ") {
        strengths.push("Contains comments");
    }

    let score = (10 - issues.len() as i64 + strengths.len() as i64).max(1);
    (
        score,
        json!({
            "score": score,
            "issues": issues,
            "strengths": strengths,
            "focus": "Clean naming, small functions, clear responsibilities",
        }),
    )
}

fn analyze_refactoring(code: &str, metrics: &Metrics) -> (i64, serde_json::Value) {
    let mut suggestions = Vec::new();

    if metrics.complexity > 8 {
        suggestions.push("High complexity - consider Extract Method refactoring");
    }
    if code.contains("switch") {
        suggestions.push("Switch statement detected - consider Replace Conditional with Polymorphism");
    }
    if metrics.functions > 10 {
        suggestions.push("Many functions - consider organizing into classes or modules");
    }

    let score = (10 - (metrics.complexity as i64) / 2).max(1);
    (
        score,
        json!({
            "score": score,
            "suggestions": suggestions,
            "focus": "Extracting methods, reducing complexity, improving design",
        }),
    )
}

fn analyze_tdd(metrics: &Metrics) -> (i64, serde_json::Value) {
    let score = if metrics.tests_present { 9 } else { 3 };
    let recommendations: &[&str] = if metrics.tests_present {
        &["Ensure all edge cases are tested", "Consider property-based testing"]
    } else {
        &[
            "Add unit tests",
            "Practice test-first development",
            "Start with simple test cases",
        ]
    };

    (
        score,
        json!({
            "score": score,
            "test_coverage": if metrics.tests_present { "Tests present" } else { "No tests detected" },
            "recommendations": recommendations,
            "focus": "Test coverage, test-first development, simple design",
        }),
    )
}

fn analyze_systems(code: &str) -> (i64, serde_json::Value) {
    let has_logging = code.contains("log") || code.contains("console");
    let has_error_handling =
        code.contains("try") || code.contains("catch") || code.contains("throw");

    let score = if has_logging { 3 } else { 0 } + if has_error_handling { 4 } else { 0 } + 3;
    (
        score,
        json!({
            "score": score,
            "observability": if has_logging { "Logging present" } else { "Add logging for observability" },
            "resilience": if has_error_handling { "Error handling present" } else { "Add error handling" },
            "focus": "Observability, error handling, system boundaries",
        }),
    )
}

fn analyze_operational(code: &str) -> (i64, serde_json::Value) {
    let has_config = code.contains("process.env") || code.contains("config");
    let has_health = code.contains("health");

    let score = if has_config { 3 } else { 0 } + if has_health { 3 } else { 0 } + 4;
    (
        score,
        json!({
            "score": score,
            "configuration": if has_config { "Environment configuration detected" } else { "Add environment configuration" },
            "monitoring": if has_health { "Health check present" } else { "Add health check endpoint" },
            "focus": "Configuration management, health checks, operational readiness",
        }),
    )
}

fn overall_recommendations(metrics: &Metrics) -> Vec<&'static str> {
    let mut recommendations = Vec::new();

    if metrics.complexity > 10 {
        recommendations.push("Reduce cyclomatic complexity");
    }
    if !metrics.tests_present {
        recommendations.push("Add comprehensive unit tests");
    }
    if metrics.functions == 0 {
        recommendations.push("Extract reusable functions");
    }

    recommendations.truncate(5);
    recommendations
}

fn action_items(score: i64) -> &'static [&'static str] {
    if score > 80 {
        &["Code quality is excellent", "Consider adding performance optimizations"]
    } else if score > 60 {
        &["Good foundation", "Focus on test coverage", "Add error handling"]
    } else {
        &[
            "Significant improvements needed",
            "Start with unit tests",
            "Refactor for clarity",
            "Add documentation",
        ]
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Code analysis tool - heuristic metrics and practitioner perspectives.
pub struct AnalyzeCodeTool;

impl AnalyzeCodeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "analyze_code_quality";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Analyze code quality using multiple practitioner perspectives";

    /// Execute the tool logic. Pure function over the code snippet.
    #[instrument(skip_all, fields(code_len = params.code.len()))]
    pub fn execute(params: &AnalyzeCodeParams) -> Result<serde_json::Value, ToolError> {
        info!("Analyzing {} bytes of {} code", params.code.len(), params.language);

        let metrics = compute_metrics(&params.code);

        let (clean_score, clean) = analyze_clean_code(&params.code, &metrics);
        let (refactor_score, refactoring) = analyze_refactoring(&params.code, &metrics);
        let (tdd_score, tdd) = analyze_tdd(&metrics);
        let (systems_score, systems) = analyze_systems(&params.code);
        let (operational_score, operational) = analyze_operational(&params.code);

        let scores = [clean_score, refactor_score, tdd_score, systems_score, operational_score];
        let overall_score =
            (scores.iter().sum::<i64>() as f64 / scores.len() as f64 * 10.0).round() as i64;

        let echoed_code = if params.code.len() > CODE_ECHO_LIMIT {
            let cut = params
                .code
                .char_indices()
                .take_while(|(i, _)| *i < CODE_ECHO_LIMIT)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}...", &params.code[..cut])
        } else {
            params.code.clone()
        };

        Ok(json!({
            "code": echoed_code,
            "language": params.language,
            "focus_areas": params.focus_areas,
            "metrics": {
                "lines": metrics.lines,
                "functions": metrics.functions,
                "classes": metrics.classes,
                "complexity": metrics.complexity,
                "test_coverage": if metrics.tests_present { "Present" } else { "Missing" },
            },
            "overall_score": overall_score,
            "practitioner_perspectives": {
                "uncle-bob": clean,
                "martin-fowler": refactoring,
                "kent-beck": tdd,
                "jessica-kerr": systems,
                "kelsey-hightower": operational,
            },
            "recommendations": overall_recommendations(&metrics),
            "action_items": action_items(overall_score),
        }))
    }

    /// Dispatch entry point used by the registry: raw arguments in, value out.
    pub fn call(arguments: serde_json::Value) -> Result<serde_json::Value, ToolError> {
        let params: AnalyzeCodeParams = parse_params(arguments)?;
        Self::execute(&params)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<AnalyzeCodeParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>() -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let value =
                    Self::call(serde_json::Value::Object(args)).map_err(mcp_error)?;
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

    fn analyze(code: &str) -> serde_json::Value {
        let params = AnalyzeCodeParams {
            code: code.to_string(),
            language: default_language(),
            focus_areas: default_focus_areas(),
        };
        AnalyzeCodeTool::execute(&params).unwrap()
    }

    #[test]
    fn test_single_function_with_branch() {
        let value = analyze("function f(){ if(x){} }");
        assert_eq!(value["metrics"]["functions"], 1);
        assert!(value["metrics"]["complexity"].as_i64().unwrap() >= 2);
        assert_eq!(value["metrics"]["lines"], 1);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let code = "const add = (a, b) => a + b;\nif (flag) { log(add(1, 2)); }";
        let first = analyze(code);
        let second = analyze(code);
        assert_eq!(first["metrics"], second["metrics"]);
        assert_eq!(first["overall_score"], second["overall_score"]);
    }

    #[test]
    fn test_complexity_is_capped() {
        let code = "if a { } else if b { } else if c { }".repeat(10);
        let value = analyze(&code);
        assert_eq!(value["metrics"]["complexity"], 15);
    }

    #[test]
    fn test_class_and_arrow_counting() {
        let value = analyze("class Foo {}\nconst f = () => 1;\nconst g = () => 2;");
        assert_eq!(value["metrics"]["classes"], 1);
        assert_eq!(value["metrics"]["functions"], 2);
    }

    #[test]
    fn test_call_sites_do_not_count_as_functions() {
        let value = analyze("foo(1); bar(2); baz(3);");
        assert_eq!(value["metrics"]["functions"], 0);
    }

    #[test]
    fn test_missing_tests_produce_recommendation() {
        let value = analyze("function f(){ return 1; }");
        assert_eq!(value["metrics"]["test_coverage"], "Missing");
        let recs = value["recommendations"].as_array().unwrap();
        assert!(recs.iter().any(|r| {
            r.as_str().unwrap().contains("unit tests")
        }));
    }

    #[test]
    fn test_tests_detected() {
        let value = analyze("describe('f', () => { test('works', () => {}) })");
        assert_eq!(value["metrics"]["test_coverage"], "Present");
        assert_eq!(value["practitioner_perspectives"]["kent-beck"]["score"], 9);
    }

    #[test]
    fn test_long_code_is_truncated_in_echo() {
        let code = "x".repeat(500);
        let value = analyze(&code);
        let echoed = value["code"].as_str().unwrap();
        assert!(echoed.len() <= CODE_ECHO_LIMIT + 3);
        assert!(echoed.ends_with("..."));
    }

    #[test]
    fn test_missing_code_fails() {
        let result = AnalyzeCodeTool::call(serde_json::json!({ "language": "rust" }));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_overall_score_range() {
        let value = analyze("function f(){ if(x){} }");
        let score = value["overall_score"].as_i64().unwrap();
        assert!((10..=100).contains(&score));
    }
}
