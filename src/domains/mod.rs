//! Domains module containing business logic organized by bounded contexts.
//!
//! `sage` owns everything that talks to the accounting API; `tools` turns
//! MCP tool calls into requests for it.

pub mod sage;
pub mod tools;
