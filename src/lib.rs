//! Sage Accounting MCP Server Library
//!
//! Exposes the Sage Business Cloud Accounting API as Model Context Protocol
//! tools.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server handler and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **sage**: authenticated API gateway with refresh-on-401, OAuth token endpoint
//!   - **tools**: the dispatch table mapping each tool to a Sage endpoint
//!
//! # Example
//!
//! ```rust,no_run
//! use sage_accounting_mcp::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
