//! Engineering-Workflow MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server exposing four
//! deterministic engineering-workflow tools: practitioner style selection,
//! styled code generation, team workflow coordination, and heuristic code
//! quality analysis.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, the server handler, and the
//!   transport adapters (stdio, TCP, HTTP behind feature flags)
//! - **domains::tools**: The tool registry, router, and one definition file
//!   per tool
//!
//! Tool handlers are pure functions over their arguments. The dispatch
//! gateway guarantees every request produces exactly one well-formed response
//! envelope, success or error.
//!
//! # Example
//!
//! ```rust,no_run
//! use workflow_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
