//! Tools domain module.
//!
//! This module exposes the Sage Accounting API as MCP tools.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool definitions, one file per Sage resource
//! - `handlers.rs` - The `SageTool` trait and result envelope helpers
//! - `registry.rs` - Dispatch table from tool name to request projection
//! - `router.rs` - rmcp ToolRouter built from the registry
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Add a unit struct implementing `SageTool` in the matching `definitions/` file
//! 2. Export it in `definitions/mod.rs`
//! 3. Add a `ToolEntry::of::<YourTool>()` row to the catalog in `registry.rs`
//!
//! The router and the HTTP transport pick it up from the registry.

pub mod definitions;
mod error;
mod handlers;
mod registry;
pub mod router;

pub use error::ToolError;
pub use handlers::{SageTool, build_request, error_result, success_result, to_tool};
pub use registry::{ToolEntry, ToolRegistry};
pub use router::build_tool_router;
