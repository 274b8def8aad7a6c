//! Shared helpers for tool definitions.
//!
//! Every tool produces a `serde_json::Value` and the gateway wraps it into a
//! single text content block containing the JSON-encoded payload. The helpers
//! here do that wrapping and the argument parsing so each definition stays
//! focused on its own table lookups.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::de::DeserializeOwned;

use super::super::error::ToolError;

/// Parse raw JSON-RPC arguments into a tool's params struct.
///
/// Missing required fields or wrong primitive types surface as
/// `ToolError::InvalidArguments`; optional fields take their serde defaults.
pub(crate) fn parse_params<T: DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Wrap a tool's output value as a single JSON-encoded text content block.
pub(crate) fn json_content(value: &serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Convert a tool error into the rmcp protocol error for stdio/TCP clients.
pub(crate) fn mcp_error(err: ToolError) -> McpError {
    match err {
        ToolError::InvalidArguments(msg) => McpError::invalid_params(msg, None),
        ToolError::NotFound(msg) => McpError::invalid_params(msg, None),
        ToolError::ExecutionFailed(msg) | ToolError::Internal(msg) => {
            McpError::internal_error(msg, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        name: String,
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn test_parse_params_defaults_optional_fields() {
        let params: Params = parse_params(serde_json::json!({ "name": "x" })).unwrap();
        assert_eq!(params.name, "x");
        assert_eq!(params.count, 0);
    }

    #[test]
    fn test_parse_params_rejects_missing_required() {
        let result: Result<Params, _> = parse_params(serde_json::json!({ "count": 3 }));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_json_content_is_valid_json_text() {
        let result = json_content(&serde_json::json!({ "a": 1 })).unwrap();
        let text = match &result.content[0].raw {
            rmcp::model::RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        };
        let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(parsed["a"], 1);
    }
}
