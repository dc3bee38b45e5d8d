//! Sage Accounting API gateway.
//!
//! This module owns everything that talks to Sage over the network:
//!
//! - `client.rs` - Authenticated request gateway with refresh-on-401
//! - `credentials.rs` - Shared in-memory credential holder
//! - `oauth.rs` - Token endpoint helpers (refresh and code exchange)
//! - `http.rs` - The `HttpSend` seam and its reqwest implementation
//! - `region.rs` - Region codes and base URL resolution

mod client;
mod credentials;
mod error;
pub mod http;
pub mod oauth;
mod region;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ApiRequest, SageClient};
pub use credentials::{CredentialStore, RefreshGrant};
pub use error::{SageError, SageResult};
pub use http::{HttpMethod, HttpReply, HttpSend, ReqwestSender};
pub use region::{DEFAULT_API_VERSION, Region};
