//! XHR-style transport built on ureq.
//!
//! # Design
//! Mirrors `XMLHttpRequest`: the request is handed off and completion is
//! reported through a callback, `send_with_callback`, which runs the
//! blocking client on tokio's blocking pool. The async `Transport::send`
//! bridges that callback to a oneshot channel.
//!
//! Basic credentials are opened on the connection rather than placed in the
//! headers. They are presented when the server answers with a Basic
//! challenge (`401` + `WWW-Authenticate: Basic ...`), as a browser does for
//! `xhr.open(method, url, true, user, password)`.
//!
//! Responses are read back through the raw `name: value` header block, the
//! only header view an XHR caller gets, and parsed by the core.

use apiprobe_core::normalize::{normalize_parts, parse_header_block, render_header_block};
use apiprobe_core::{
    AuthPolicy, BasicCredentials, ExecuteError, HttpRequest, RequestPayload, ResponseData,
};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use ureq::http;
use ureq::Agent;

use crate::config::ExecutorConfig;
use crate::multipart;
use crate::transport::Transport;

/// What an `onload` handler sees.
#[derive(Debug, Clone)]
pub struct XhrCompletion {
    pub status: u16,
    /// Headers as returned by `getAllResponseHeaders`.
    pub raw_headers: String,
    pub response_text: String,
}

/// What an `onerror` handler sees. Never surfaced past `Transport::send`.
#[derive(Debug, Error)]
pub enum XhrFailure {
    #[error("invalid request: {0}")]
    Request(#[from] http::Error),
    #[error(transparent)]
    Transport(#[from] ureq::Error),
}

#[derive(Clone)]
pub struct XhrTransport {
    agent: Agent,
}

impl XhrTransport {
    pub fn new(config: &ExecutorConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Start `request` and invoke `on_complete` from the blocking pool once
    /// it finishes. Must be called from within a tokio runtime.
    pub fn send_with_callback<F>(&self, request: HttpRequest, on_complete: F)
    where
        F: FnOnce(Result<XhrCompletion, XhrFailure>) + Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || on_complete(perform(&agent, &request)));
    }
}

#[async_trait]
impl Transport for XhrTransport {
    fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy::ConnectionCredentials
    }

    async fn send(&self, request: HttpRequest) -> Result<ResponseData, ExecuteError> {
        let (tx, rx) = oneshot::channel();
        self.send_with_callback(request, move |outcome| {
            let _ = tx.send(outcome);
        });

        match rx.await {
            Ok(Ok(done)) => Ok(normalize_parts(
                done.status,
                parse_header_block(&done.raw_headers),
                done.response_text,
            )),
            Ok(Err(e)) => {
                warn!(error = %e, "xhr transport failed");
                Err(ExecuteError::RequestFailed)
            }
            Err(_) => {
                warn!("xhr transport dropped its completion callback");
                Err(ExecuteError::RequestFailed)
            }
        }
    }
}

fn perform(agent: &Agent, request: &HttpRequest) -> Result<XhrCompletion, XhrFailure> {
    let first = dispatch(agent, request, None)?;
    match &request.credentials {
        Some(credentials) if first.status == 401 && is_basic_challenge(&first.raw_headers) => {
            debug!("answering basic challenge with connection credentials");
            dispatch(agent, request, Some(credentials))
        }
        _ => Ok(first),
    }
}

fn is_basic_challenge(raw_headers: &str) -> bool {
    parse_header_block(raw_headers)
        .get("www-authenticate")
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("basic"))
}

fn dispatch(
    agent: &Agent,
    request: &HttpRequest,
    credentials: Option<&BasicCredentials>,
) -> Result<XhrCompletion, XhrFailure> {
    let mut builder = http::Request::builder()
        .method(request.method.as_str())
        .uri(request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(credentials) = credentials {
        let encoded = general_purpose::STANDARD
            .encode(format!("{}:{}", credentials.username, credentials.password));
        builder = builder.header("Authorization", format!("Basic {encoded}"));
    }

    let mut response = match &request.body {
        None => agent.run(builder.body(())?)?,
        Some(RequestPayload::Text(text)) => agent.run(builder.body(text.clone().into_bytes())?)?,
        Some(RequestPayload::Multipart(fields)) => {
            let form = multipart::encode(fields);
            builder = builder.header("Content-Type", form.content_type);
            agent.run(builder.body(form.bytes)?)?
        }
    };

    let status = response.status().as_u16();
    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    // No size cap, matching the fetch transport.
    let bytes = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()?;

    Ok(XhrCompletion {
        status,
        raw_headers: render_header_block(&headers),
        response_text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_basic_challenge() {
        assert!(is_basic_challenge("www-authenticate: Basic realm=\"x\"\r\n"));
        assert!(is_basic_challenge("WWW-Authenticate: basic\r\n"));
        assert!(!is_basic_challenge("www-authenticate: Bearer\r\n"));
        assert!(!is_basic_challenge("content-type: text/plain\r\n"));
    }

    #[test]
    fn xhr_uses_connection_credentials() {
        let transport = XhrTransport::new(&ExecutorConfig::default());
        assert_eq!(transport.auth_policy(), AuthPolicy::ConnectionCredentials);
    }
}
