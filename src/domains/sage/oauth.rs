//! OAuth 2.0 token endpoint helpers.
//!
//! Used by the gateway to refresh expired access tokens and by the
//! `sage_auth` binary to exchange an authorization code.

use serde::Deserialize;
use tracing::{info, instrument};

use super::credentials::RefreshGrant;
use super::error::{SageError, SageResult};
use super::http::{HttpMethod, HttpSend, OutboundRequest, RequestBody};

/// Sage token endpoint.
pub const TOKEN_URL: &str = "https://oauth.accounting.sage.com/token";

/// Sage authorization endpoint, restricted to the v3.1 API.
pub const AUTHORIZE_URL: &str = "https://www.sageone.com/oauth2/auth/central?filter=apiv3.1";

/// Scope requested by the authorization helper.
pub const DEFAULT_SCOPE: &str = "full_access";

/// Token endpoint reply.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Exchange a refresh token for a new access token.
#[instrument(skip_all)]
pub async fn refresh_access_token(
    http: &dyn HttpSend,
    token_url: &str,
    grant: &RefreshGrant,
) -> SageResult<TokenResponse> {
    info!("Requesting new access token");
    request_token(
        http,
        token_url,
        vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", grant.refresh_token.as_str()),
            ("client_id", grant.client_id.as_str()),
            ("client_secret", grant.client_secret.as_str()),
        ],
    )
    .await
}

/// Exchange an authorization code for an access and refresh token pair.
#[instrument(skip_all)]
pub async fn exchange_authorization_code(
    http: &dyn HttpSend,
    token_url: &str,
    code: &str,
    redirect_uri: &str,
    client_id: &str,
    client_secret: &str,
) -> SageResult<TokenResponse> {
    info!("Exchanging authorization code");
    request_token(
        http,
        token_url,
        vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ],
    )
    .await
}

/// Build the URL the user opens to grant access.
pub fn authorization_url(client_id: &str, redirect_uri: &str, state: &str) -> SageResult<String> {
    let query = serde_urlencoded::to_string([
        ("client_id", client_id),
        ("response_type", "code"),
        ("redirect_uri", redirect_uri),
        ("scope", DEFAULT_SCOPE),
        ("state", state),
    ])
    .map_err(|e| SageError::transport(e.to_string()))?;
    Ok(format!("{}&{}", AUTHORIZE_URL, query))
}

async fn request_token(
    http: &dyn HttpSend,
    token_url: &str,
    fields: Vec<(&str, &str)>,
) -> SageResult<TokenResponse> {
    let request = OutboundRequest {
        method: HttpMethod::Post,
        url: token_url.to_string(),
        bearer: None,
        body: RequestBody::Form(
            fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ),
    };

    let reply = http.send(request).await?;
    if !reply.is_success() {
        return Err(SageError::token_request(reply.status, &reply.body));
    }

    serde_json::from_str(&reply.body)
        .map_err(|e| SageError::Decode(format!("token response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::sage::http::HttpReply;
    use crate::domains::sage::testing::ScriptedSender;

    fn grant() -> RefreshGrant {
        RefreshGrant {
            refresh_token: "r1".to_string(),
            client_id: "cid".to_string(),
            client_secret: "cs".to_string(),
        }
    }

    #[tokio::test]
    async fn test_refresh_sends_form_grant() {
        let sender = ScriptedSender::new(vec![HttpReply::new(
            200,
            r#"{"access_token":"new","refresh_token":"r2","expires_in":300}"#,
        )]);

        let token = refresh_access_token(&sender, TOKEN_URL, &grant()).await.unwrap();
        assert_eq!(token.access_token, "new");
        assert_eq!(token.refresh_token.as_deref(), Some("r2"));

        let requests = sender.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert!(requests[0].bearer.is_none());
        match &requests[0].body {
            RequestBody::Form(fields) => {
                assert!(fields.contains(&("grant_type".to_string(), "refresh_token".to_string())));
                assert!(fields.contains(&("refresh_token".to_string(), "r1".to_string())));
                assert!(fields.contains(&("client_id".to_string(), "cid".to_string())));
                assert!(fields.contains(&("client_secret".to_string(), "cs".to_string())));
            }
            other => panic!("Expected form body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_token_endpoint_rejection() {
        let sender = ScriptedSender::new(vec![HttpReply::new(400, r#"{"error":"invalid_grant"}"#)]);
        let err = refresh_access_token(&sender, TOKEN_URL, &grant())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[tokio::test]
    async fn test_token_response_without_access_token() {
        let sender = ScriptedSender::new(vec![HttpReply::new(200, r#"{"token_type":"bearer"}"#)]);
        let err = refresh_access_token(&sender, TOKEN_URL, &grant())
            .await
            .unwrap_err();
        assert!(matches!(err, SageError::Decode(_)));
    }

    #[tokio::test]
    async fn test_exchange_authorization_code() {
        let sender = ScriptedSender::new(vec![HttpReply::new(
            200,
            r#"{"access_token":"a","refresh_token":"r"}"#,
        )]);
        let token = exchange_authorization_code(
            &sender,
            TOKEN_URL,
            "code-1",
            "http://localhost:8080/callback",
            "cid",
            "cs",
        )
        .await
        .unwrap();
        assert_eq!(token.access_token, "a");

        let requests = sender.requests();
        match &requests[0].body {
            RequestBody::Form(fields) => {
                assert!(fields.contains(&(
                    "grant_type".to_string(),
                    "authorization_code".to_string()
                )));
                assert!(fields.contains(&("code".to_string(), "code-1".to_string())));
            }
            other => panic!("Expected form body, got {:?}", other),
        }
    }

    #[test]
    fn test_authorization_url() {
        let url = authorization_url("cid", "http://localhost:8080/callback", "xyz").unwrap();
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fcallback"));
        assert!(url.contains("state=xyz"));
    }
}
