//! Styled code generation tool.
//!
//! Returns a fixture code template in the requested practitioner's style with
//! the code type and requirements substituted in. This is template
//! substitution, not synthesis: the output is canned data and deterministic.
//!
//! Templates use the `{{variable}}` placeholder syntax.

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

/// Parameters for the code generation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateCodeParams {
    /// Practitioner style to emulate: "uncle-bob", "martin-fowler",
    /// "kent-beck", "jessica-kerr", or "kelsey-hightower".
    #[schemars(
        description = "Practitioner to emulate: uncle-bob, martin-fowler, kent-beck, jessica-kerr, kelsey-hightower"
    )]
    pub practitioner: String,

    /// Type of code to generate (class name, function name, etc.).
    #[schemars(description = "Type of code to generate (class, function, etc.)")]
    pub code_type: String,

    /// Specific requirements the generated code should address.
    #[schemars(description = "Specific requirements for the code")]
    pub requirements: String,

    /// Target programming language. Defaults to "typescript".
    #[serde(default = "default_language")]
    #[schemars(description = "Programming language (default: typescript)")]
    pub language: String,
}

fn default_language() -> String {
    "typescript".to_string()
}

// ============================================================================
// Code Templates (fixture data)
// ============================================================================

struct CodeStyle {
    practitioner: &'static str,
    template: &'static str,
    principles: &'static [&'static str],
}

/// `uncle-bob` is also the fallback entry under the permissive policy.
const FALLBACK_PRACTITIONER: &str = "uncle-bob";

static CODE_STYLES: &[CodeStyle] = &[
    CodeStyle {
        practitioner: "uncle-bob",
        principles: &[
            "Single Responsibility",
            "Open/Closed",
            "Liskov Substitution",
            "Interface Segregation",
            "Dependency Inversion",
        ],
        template: r#"// Clean Code - {{code_type}}
export class {{code_type}} {
  constructor(private readonly dependencies: Dependencies) {
    this.validateDependencies(dependencies);
  }

  public execute(request: {{code_type}}Request): {{code_type}}Response {
    this.validateRequest(request);
    const result = this.processRequest(request);
    return this.formatResponse(result);
  }

  private validateRequest(request: {{code_type}}Request): void {
    if (!request) {
      throw new Error('Request cannot be null');
    }
    // {{requirements}} - Add specific validation
  }

  private processRequest(request: {{code_type}}Request): ProcessResult {
    // Core business logic: {{requirements}}
    // Following single responsibility principle
    return { success: true, data: request };
  }

  private formatResponse(result: ProcessResult): {{code_type}}Response {
    return {
      timestamp: new Date().toISOString(),
      success: result.success,
      data: result.data
    };
  }

  private validateDependencies(deps: Dependencies): void {
    if (!deps) {
      throw new Error('Dependencies are required');
    }
  }
}"#,
    },
    CodeStyle {
        practitioner: "martin-fowler",
        principles: &[
            "Domain modeling",
            "Enterprise patterns",
            "Refactoring",
            "Evolutionary architecture",
        ],
        template: r#"// Enterprise Patterns - {{code_type}}
export class {{code_type}} {
  constructor(
    private readonly repository: {{code_type}}Repository,
    private readonly validator: {{code_type}}Validator,
    private readonly eventBus: EventBus
  ) {}

  async handle(command: {{code_type}}Command): Promise<{{code_type}}Result> {
    // {{requirements}}

    await this.validator.validate(command);

    const aggregate = await this.repository.findById(command.aggregateId);
    const result = aggregate.process(command);

    await this.repository.save(aggregate);
    await this.eventBus.publish(new {{code_type}}ProcessedEvent(result));

    return result;
  }
}

// Repository Pattern
export interface {{code_type}}Repository {
  findById(id: string): Promise<{{code_type}}Aggregate>;
  save(aggregate: {{code_type}}Aggregate): Promise<void>;
}

// Domain Event
export class {{code_type}}ProcessedEvent {
  constructor(
    public readonly result: {{code_type}}Result,
    public readonly timestamp: Date = new Date()
  ) {}
}"#,
    },
    CodeStyle {
        practitioner: "kent-beck",
        principles: &[
            "Test-first",
            "Simple design",
            "Incremental development",
            "Refactor mercilessly",
        ],
        template: r#"// Test-First - {{code_type}}
// 1. Write the test first
describe('{{code_type}}', () => {
  test('should {{requirements_lower}}', () => {
    // Arrange
    const {{code_type_lower}} = new {{code_type}}();
    const input = createTestInput();

    // Act
    const result = {{code_type_lower}}.process(input);

    // Assert
    expect(result).toBeDefined();
    expect(result.success).toBe(true);
  });

  function createTestInput() {
    return { /* minimal test data */ };
  }
});

// 2. Make it pass with simplest implementation
export class {{code_type}} {
  process(input: any): ProcessResult {
    // {{requirements}}
    // Simplest thing that could possibly work
    return {
      success: true,
      data: this.transform(input),
      message: 'Processed successfully'
    };
  }

  private transform(input: any): any {
    return { ...input, processed: true };
  }
}"#,
    },
    CodeStyle {
        practitioner: "jessica-kerr",
        principles: &[
            "Functional programming",
            "Systems thinking",
            "Observability",
            "Composition",
        ],
        template: r#"// Systems Thinking - {{code_type}}
// Functional composition with observability

export const create{{code_type}}Pipeline = (
  logger: Logger,
  metrics: Metrics
) => {
  return (input: {{code_type}}Input) =>
    pipe(
      input,
      logStart,
      validateInput,
      processCore,
      logCompletion
    );

  function logStart(input: {{code_type}}Input): {{code_type}}Input {
    logger.info('Starting {{code_type_lower}} process');
    metrics.increment('{{code_type_lower}}.started');
    return input;
  }

  function validateInput(input: {{code_type}}Input): {{code_type}}Input {
    if (!input) {
      metrics.increment('{{code_type_lower}}.validation_failed');
      throw new Error('Input validation failed');
    }
    return input;
  }

  function processCore(input: {{code_type}}Input): {{code_type}}Output {
    // {{requirements}}
    return {
      processedData: transform(input),
      metadata: { version: '1.0.0' }
    };
  }

  function logCompletion(output: {{code_type}}Output): {{code_type}}Output {
    metrics.increment('{{code_type_lower}}.completed');
    return output;
  }

  function transform(input: {{code_type}}Input): any {
    // Pure transformation logic
    return { ...input, transformed: true };
  }
};

// Compose higher-order functions
const pipe = (...fns: Function[]) => (value: any) =>
  fns.reduce((acc, fn) => fn(acc), value);"#,
    },
    CodeStyle {
        practitioner: "kelsey-hightower",
        principles: &[
            "Cloud-native design",
            "Operational excellence",
            "Automation",
            "Monitoring",
        ],
        template: r#"// Cloud-Native - {{code_type}}
export class {{code_type}}Service {
  private readonly config = {
    timeout: parseInt(process.env.TIMEOUT || '5000'),
    retries: parseInt(process.env.RETRIES || '3'),
    serviceName: process.env.SERVICE_NAME || '{{code_type_lower}}-service'
  };

  constructor(
    private readonly logger: Logger,
    private readonly metrics: Metrics
  ) {}

  async handle(req: Request, res: Response): Promise<void> {
    const traceId = req.headers['x-trace-id'] as string;

    try {
      // {{requirements}}
      const result = await this.processWithRetry(req.body, traceId);

      this.metrics.increment('request.success');
      res.status(200).json({ success: true, data: result, traceId });
    } catch (error) {
      this.metrics.increment('request.error');
      this.logger.error('Request failed', { traceId, error: error.message });
      res.status(500).json({ success: false, error: error.message });
    }
  }

  private async processWithRetry(data: any, traceId: string): Promise<any> {
    let attempt = 0;

    while (attempt < this.config.retries) {
      try {
        return await this.processData(data, traceId);
      } catch (error) {
        attempt++;
        if (attempt === this.config.retries) {
          throw error;
        }
        await this.delay(Math.pow(2, attempt) * 1000); // Exponential backoff
      }
    }
  }

  private async processData(data: any, traceId: string): Promise<any> {
    return { result: 'processed', data, traceId };
  }

  private delay(ms: number): Promise<void> {
    return new Promise(resolve => setTimeout(resolve, ms));
  }

  // Health check endpoint
  health(): { status: string; service: string } {
    return { status: 'healthy', service: this.config.serviceName };
  }
}"#,
    },
];

fn lookup_style(practitioner: &str, policy: LookupPolicy) -> Result<&'static CodeStyle, ToolError> {
    match CODE_STYLES.iter().find(|s| s.practitioner == practitioner) {
        Some(style) => Ok(style),
        None => match policy {
            LookupPolicy::Strict => Err(ToolError::invalid_arguments(format!(
                "Unknown practitioner: {}. Expected one of: uncle-bob, martin-fowler, \
                 kent-beck, jessica-kerr, kelsey-hightower",
                practitioner
            ))),
            LookupPolicy::Permissive => Ok(CODE_STYLES
                .iter()
                .find(|s| s.practitioner == FALLBACK_PRACTITIONER)
                .unwrap_or(&CODE_STYLES[0])),
        },
    }
}

/// Substitute `{{code_type}}`, `{{code_type_lower}}`, `{{requirements}}` and
/// `{{requirements_lower}}` into a template.
fn render_template(template: &str, code_type: &str, requirements: &str) -> String {
    template
        .replace("{{code_type_lower}}", &code_type.to_lowercase())
        .replace("{{code_type}}", code_type)
        .replace("{{requirements_lower}}", &requirements.to_lowercase())
        .replace("{{requirements}}", requirements)
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Code generation tool - renders a styled code template.
pub struct GenerateCodeTool;

impl GenerateCodeTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_code_with_style";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Generate code following a specific practitioner's style";

    /// Execute the tool logic. Pure template substitution.
    #[instrument(skip_all, fields(practitioner = %params.practitioner))]
    pub fn execute(
        params: &GenerateCodeParams,
        config: &Config,
    ) -> Result<serde_json::Value, ToolError> {
        info!(
            "Generating {} code in {} style",
            params.code_type, params.practitioner
        );

        let style = lookup_style(&params.practitioner, config.tools.lookup_policy)?;
        let generated = render_template(style.template, &params.code_type, &params.requirements);

        Ok(json!({
            "practitioner": params.practitioner,
            "code_type": params.code_type,
            "requirements": params.requirements,
            "language": params.language,
            "generated_code": generated,
            "principles": style.principles,
            "usage": format!(
                "This code follows {}'s software engineering principles and best practices for {}.",
                style.practitioner, params.requirements
            ),
        }))
    }

    /// Dispatch entry point used by the registry: raw arguments in, value out.
    pub fn call(
        arguments: serde_json::Value,
        config: &Config,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GenerateCodeParams = parse_params(arguments)?;
        Self::execute(&params, config)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GenerateCodeParams>(),
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

    fn params(practitioner: &str) -> GenerateCodeParams {
        GenerateCodeParams {
            practitioner: practitioner.to_string(),
            code_type: "OrderProcessor".to_string(),
            requirements: "Validate and persist orders".to_string(),
            language: default_language(),
        }
    }

    #[test]
    fn test_template_substitution() {
        let value = GenerateCodeTool::execute(&params("uncle-bob"), &strict_config()).unwrap();
        let code = value["generated_code"].as_str().unwrap();
        assert!(code.contains("class OrderProcessor"));
        assert!(code.contains("Validate and persist orders"));
        assert!(!code.contains("{{code_type}}"));
        assert!(!code.contains("{{requirements}}"));
    }

    #[test]
    fn test_lowercase_placeholder() {
        let value = GenerateCodeTool::execute(&params("kent-beck"), &strict_config()).unwrap();
        let code = value["generated_code"].as_str().unwrap();
        assert!(code.contains("const orderprocessor = new OrderProcessor()"));
    }

    #[test]
    fn test_each_practitioner_has_principles() {
        for practitioner in [
            "uncle-bob",
            "martin-fowler",
            "kent-beck",
            "jessica-kerr",
            "kelsey-hightower",
        ] {
            let value = GenerateCodeTool::execute(&params(practitioner), &strict_config()).unwrap();
            let principles = value["principles"].as_array().unwrap();
            assert!(!principles.is_empty(), "{} has no principles", practitioner);
        }
    }

    #[test]
    fn test_language_defaults_to_typescript() {
        let value = GenerateCodeTool::call(
            serde_json::json!({
                "practitioner": "martin-fowler",
                "code_type": "Invoice",
                "requirements": "Aggregate line items"
            }),
            &strict_config(),
        )
        .unwrap();
        assert_eq!(value["language"], "typescript");
    }

    #[test]
    fn test_unknown_practitioner_strict_fails() {
        let result = GenerateCodeTool::execute(&params("linus"), &strict_config());
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_unknown_practitioner_permissive_uses_fallback() {
        let mut config = Config::default();
        config.tools.lookup_policy = LookupPolicy::Permissive;
        let value = GenerateCodeTool::execute(&params("linus"), &config).unwrap();
        let code = value["generated_code"].as_str().unwrap();
        // Fallback is the uncle-bob clean code template
        assert!(code.contains("Clean Code"));
    }

    #[test]
    fn test_missing_requirements_fails() {
        let result = GenerateCodeTool::call(
            serde_json::json!({ "practitioner": "uncle-bob", "code_type": "Widget" }),
            &strict_config(),
        );
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
