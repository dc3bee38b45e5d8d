//! Authenticated request gateway for the Sage Accounting API.
//!
//! Every tool call goes through [`SageClient::execute`]. Expiry is detected
//! reactively: a 401 triggers exactly one refresh and exactly one retry, and
//! whatever the retry returns is final.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::credentials::CredentialStore;
use super::error::{SageError, SageResult};
use super::http::{HttpMethod, HttpReply, HttpSend, OutboundRequest, RequestBody, ReqwestSender};
use super::oauth::{self, TOKEN_URL};
use crate::core::config::SageConfig;

/// A request against the Sage API, relative to the client's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path including any query string, e.g. `/contacts?search=acme`.
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Sage API client owning the shared credential state.
#[derive(Clone)]
pub struct SageClient {
    base_url: String,
    credentials: Arc<CredentialStore>,
    http: Arc<dyn HttpSend>,
}

impl SageClient {
    /// Create a client for `base_url` using the given credentials and sender.
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<CredentialStore>,
        http: Arc<dyn HttpSend>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            http,
        }
    }

    /// Create a client from the Sage section of the server config.
    pub fn from_config(config: &SageConfig) -> SageResult<Self> {
        let http = Arc::new(ReqwestSender::new()?);
        let credentials = Arc::new(CredentialStore::from_config(config));
        Ok(Self::new(config.base_url(), credentials, http))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.credentials
    }

    /// Issue `request`, refreshing the access token once on a 401.
    #[instrument(skip_all, fields(method = request.method.as_str(), path = %request.path))]
    pub async fn execute(&self, request: &ApiRequest) -> SageResult<Value> {
        let token = self
            .credentials
            .access_token()
            .await
            .ok_or(SageError::MissingAccessToken)?;

        let mut reply = self.send(request, token).await?;

        if reply.status == 401 {
            warn!("Access token rejected, refreshing once");
            let fresh = self.refresh().await?;
            reply = self.send(request, fresh).await?;
        }

        Self::decode(reply)
    }

    async fn send(&self, request: &ApiRequest, token: String) -> SageResult<HttpReply> {
        let body = match &request.body {
            Some(body) if request.method.is_write() => RequestBody::Json(body.clone()),
            _ => RequestBody::Empty,
        };

        self.http
            .send(OutboundRequest {
                method: request.method,
                url: format!("{}{}", self.base_url, request.path),
                bearer: Some(token),
                body,
            })
            .await
    }

    /// Obtain a new access token and store it for every later call.
    async fn refresh(&self) -> SageResult<String> {
        let grant = self.credentials.refresh_grant().map_err(SageError::refresh)?;

        let token = oauth::refresh_access_token(self.http.as_ref(), TOKEN_URL, &grant)
            .await
            .map_err(|e| SageError::refresh(e.to_string()))?;

        if let Some(issued) = token.refresh_token.as_deref() {
            if Some(issued) != self.credentials.refresh_token() {
                warn!(
                    "Token endpoint issued a new refresh token; it is not persisted. \
                     Update SAGE_REFRESH_TOKEN before the current one expires"
                );
            }
        }

        self.credentials
            .replace_access_token(token.access_token.clone())
            .await;
        info!("Access token refreshed");

        Ok(token.access_token)
    }

    fn decode(reply: HttpReply) -> SageResult<Value> {
        if !reply.is_success() {
            return Err(SageError::api(reply.status, &reply.body));
        }

        if reply.body.trim().is_empty() {
            debug!("Empty {} response body", reply.status);
            return Ok(Value::Null);
        }

        serde_json::from_str(&reply.body).map_err(|e| SageError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for SageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SageClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
