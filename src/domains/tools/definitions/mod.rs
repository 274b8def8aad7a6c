//! Tool definitions module.
//!
//! One file per tool. Each definition owns its params struct, its static
//! lookup tables, `execute()` (pure logic), `call()` (raw-arguments dispatch
//! entry), and `create_route()` for the rmcp transports.

mod analyze_code;
mod common;
mod coordinate_workflow;
mod generate_code;
mod select_style;

pub use analyze_code::{AnalyzeCodeParams, AnalyzeCodeTool};
pub use coordinate_workflow::{CoordinateWorkflowParams, CoordinateWorkflowTool};
pub use generate_code::{GenerateCodeParams, GenerateCodeTool};
pub use select_style::{SelectStyleParams, SelectStyleTool};
