//! Tools domain module.
//!
//! Everything callable through `tools/call` lives here.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - ToolRouter builder for STDIO/TCP transport
//! - `registry.rs` - Central tool registry and dispatch-by-name
//! - `id_gen.rs` - Injected coordination-id generator capability
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` with params, `execute()`, `call()`,
//!    `to_tool()`, and `create_route()`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a route in `router.rs` and a dispatch arm in `registry.rs`

pub mod definitions;
mod error;
pub mod id_gen;
mod registry;
pub mod router;

pub use error::ToolError;
pub use id_gen::{CoordinationIdGen, SequentialIdGen};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
