//! One-shot OAuth helper.
//!
//! Prints the Sage authorization URL, waits for the browser redirect on a
//! local callback listener, exchanges the code at the token endpoint and
//! prints the resulting tokens as `.env` lines on stdout.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use tokio::net::TcpListener;
use tokio::sync::{Mutex, oneshot};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use sage_accounting_mcp::core::Config;
use sage_accounting_mcp::domains::sage::ReqwestSender;
use sage_accounting_mcp::domains::sage::oauth::{self, TOKEN_URL};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Code or failure reason carried by the browser redirect.
type CallbackOutcome = std::result::Result<String, String>;

/// State shared with the callback handler.
#[derive(Clone)]
struct CallbackState {
    expected_state: Arc<str>,
    outcome: Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let sage = &config.sage;
    let client_id = sage
        .client_id
        .clone()
        .context("SAGE_CLIENT_ID must be set")?;
    let client_secret = sage
        .client_secret
        .clone()
        .context("SAGE_CLIENT_SECRET must be set")?;
    let redirect_uri = sage.redirect_uri();

    let state = new_state();
    let url = oauth::authorization_url(&client_id, &redirect_uri, &state)?;

    let addr = format!("127.0.0.1:{}", sage.callback_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind callback listener on {}", addr))?;

    let (outcome_tx, outcome_rx) = oneshot::channel();
    let app = Router::new()
        .route("/callback", get(handle_callback))
        .with_state(CallbackState {
            expected_state: state.into(),
            outcome: Arc::new(Mutex::new(Some(outcome_tx))),
        });

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
    });

    eprintln!("Open this URL in your browser to authorize access:\n\n{}\n", url);
    info!("Waiting for the OAuth callback on {}", redirect_uri);

    let outcome = tokio::time::timeout(CALLBACK_TIMEOUT, outcome_rx).await;
    shutdown_tx.send(()).ok();
    server.await??;

    let code = match outcome {
        Err(_) => bail!("Timed out after 5 minutes waiting for the OAuth callback"),
        Ok(Err(_)) => bail!("Callback listener stopped before a code arrived"),
        Ok(Ok(Err(reason))) => bail!("Authorization failed: {}", reason),
        Ok(Ok(Ok(code))) => code,
    };

    let http = ReqwestSender::new()?;
    let tokens = oauth::exchange_authorization_code(
        &http,
        TOKEN_URL,
        &code,
        &redirect_uri,
        &client_id,
        &client_secret,
    )
    .await?;

    info!("Authorization complete");
    println!("SAGE_ACCESS_TOKEN={}", tokens.access_token);
    match tokens.refresh_token {
        Some(refresh_token) => println!("SAGE_REFRESH_TOKEN={}", refresh_token),
        None => warn!("Token endpoint did not return a refresh token"),
    }

    Ok(())
}

/// Handle the browser redirect; only the first one is acted on.
async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<&'static str>) {
    let outcome = check_callback(&params, &state.expected_state);
    let reply = match &outcome {
        Ok(_) => (
            StatusCode::OK,
            Html("<p>Authorization received. You can close this window.</p>"),
        ),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Html("<p>Authorization failed. Check the terminal for details.</p>"),
        ),
    };

    match state.outcome.lock().await.take() {
        Some(sender) => {
            sender.send(outcome).ok();
        }
        None => warn!("Ignoring repeated OAuth callback"),
    }

    reply
}

/// Validate the redirect query and extract the authorization code.
fn check_callback(params: &HashMap<String, String>, expected_state: &str) -> CallbackOutcome {
    if let Some(error) = params.get("error") {
        let detail = params
            .get("error_description")
            .map(String::as_str)
            .unwrap_or_default();
        return Err(format!("{} {}", error, detail).trim().to_string());
    }

    if params.get("state").map(String::as_str) != Some(expected_state) {
        return Err("state mismatch; the callback did not come from this session".to_string());
    }

    match params.get("code") {
        Some(code) if !code.is_empty() => Ok(code.clone()),
        _ => Err("callback carried no authorization code".to_string()),
    }
}

/// Unguessable value tying the callback to this run.
fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn callback_state(expected: &str) -> (CallbackState, oneshot::Receiver<CallbackOutcome>) {
        let (tx, rx) = oneshot::channel();
        let state = CallbackState {
            expected_state: expected.into(),
            outcome: Arc::new(Mutex::new(Some(tx))),
        };
        (state, rx)
    }

    #[test]
    fn test_check_callback_accepts_matching_state() {
        let outcome = check_callback(&params(&[("code", "abc/123"), ("state", "s1")]), "s1");
        assert_eq!(outcome, Ok("abc/123".to_string()));
    }

    #[test]
    fn test_check_callback_rejects_state_mismatch() {
        let outcome = check_callback(&params(&[("code", "abc"), ("state", "forged")]), "s1");
        assert!(outcome.unwrap_err().contains("state mismatch"));

        let outcome = check_callback(&params(&[("code", "abc")]), "s1");
        assert!(outcome.is_err());
    }

    #[test]
    fn test_check_callback_reports_denial() {
        let outcome = check_callback(
            &params(&[("error", "access_denied"), ("error_description", "User cancelled")]),
            "s1",
        );
        assert_eq!(outcome, Err("access_denied User cancelled".to_string()));
    }

    #[test]
    fn test_check_callback_requires_code() {
        let outcome = check_callback(&params(&[("state", "s1"), ("code", "")]), "s1");
        assert!(outcome.unwrap_err().contains("no authorization code"));
    }

    #[tokio::test]
    async fn test_handler_forwards_code_once() {
        let (state, rx) = callback_state("s1");

        let (status, _) = handle_callback(
            State(state.clone()),
            Query(params(&[("code", "c1"), ("state", "s1")])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rx.await.unwrap(), Ok("c1".to_string()));

        let (status, _) = handle_callback(
            State(state),
            Query(params(&[("code", "c2"), ("state", "s1")])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handler_rejects_forged_state() {
        let (state, rx) = callback_state("s1");
        let (status, _) = handle_callback(
            State(state),
            Query(params(&[("code", "c1"), ("state", "other")])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(rx.await.unwrap().is_err());
    }

    #[test]
    fn test_state_is_unique_per_run() {
        let first = new_state();
        let second = new_state();
        assert_eq!(first.len(), 32);
        assert_ne!(first, second);
    }
}
