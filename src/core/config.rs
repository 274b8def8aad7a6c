//! Configuration management for the workflow MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables or defaults. Configuration is built
//! once at startup and shared immutably (via `Arc`) with the tool registry
//! and transports - no tool ever mutates it.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Main configuration structure for the workflow MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tools domain configuration.
    pub tools: ToolsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Configuration for the tools domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// How handlers treat unknown values for closed-enum arguments
    /// (task type, practitioner, workflow name).
    pub lookup_policy: LookupPolicy,
}

/// Policy for unknown closed-enum argument values.
///
/// The historical behavior was to silently substitute a fallback table entry.
/// That substitution is now an explicit choice: `Strict` rejects the value
/// with an invalid-arguments error, `Permissive` uses each table's documented
/// fallback entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupPolicy {
    /// Unknown enum values fail the call with an invalid-arguments error.
    #[default]
    Strict,

    /// Unknown enum values fall back to the table's designated default entry.
    Permissive,
}

impl LookupPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "strict" => Some(Self::Strict),
            "permissive" => Some(Self::Permissive),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "workflow-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            tools: ToolsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_LOOKUP_POLICY`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(policy) = std::env::var("MCP_LOOKUP_POLICY") {
            if let Some(parsed) = LookupPolicy::parse(&policy) {
                config.tools.lookup_policy = parsed;
                info!("Tool lookup policy set to {:?}", parsed);
            }
        }

        config.transport = TransportConfig::from_env();

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_policy_is_strict() {
        let config = Config::default();
        assert_eq!(config.tools.lookup_policy, LookupPolicy::Strict);
    }

    #[test]
    fn test_lookup_policy_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LOOKUP_POLICY", "permissive");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.lookup_policy, LookupPolicy::Permissive);
        unsafe {
            std::env::remove_var("MCP_LOOKUP_POLICY");
        }
    }

    #[test]
    fn test_lookup_policy_invalid_value_keeps_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_LOOKUP_POLICY", "lenient");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.lookup_policy, LookupPolicy::Strict);
        unsafe {
            std::env::remove_var("MCP_LOOKUP_POLICY");
        }
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "custom-server");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "custom-server");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }
}
