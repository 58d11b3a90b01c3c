//! Loopback HTTP server the transports are tested against.
//!
//! Every route answers deterministically so the two transports can be
//! compared response for response. `/echo` reflects the request it received,
//! which is how tests observe what actually went over the wire.

use axum::{
    body::Bytes,
    extract::Path,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE},
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const TEXT_BODY: &str = "plain {\"not\": \"json\"}";
pub const MALFORMED_JSON_BODY: &str = "{\"a\":";
pub const JSON_BODY: &str = "{\"b\":2,\"a\":[1,{\"c\":null}]}";
pub const NUMBERS_JSON_BODY: &str =
    "{\"whole\":1.0,\"exp\":1e2,\"frac\":1.5,\"big\":1e21,\"small\":1e-7}";
/// Largest body `/bytes/{count}` will produce.
pub const MAX_BYTES: usize = 64 * 1024 * 1024;

/// What `/echo` saw, returned as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    /// Header names as received (lower-case), in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl EchoedRequest {
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/basic", any(basic_challenge))
        .route("/text", get(text))
        .route("/json", get(json))
        .route("/malformed-json", get(malformed_json))
        .route("/numbers", get(numbers))
        .route("/bytes/{count}", get(repeated_bytes))
        .route("/duplicate-headers", get(duplicate_headers))
        .route("/status/{code}", any(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<EchoedRequest> {
    debug!(%method, %uri, "echoing request");
    Json(EchoedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn basic_challenge(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let authorized = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if authorized {
        echo(method, uri, headers, body).await.into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(WWW_AUTHENTICATE, "Basic realm=\"mock\"")],
            "authentication required",
        )
            .into_response()
    }
}

async fn text() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/plain; charset=utf-8")], TEXT_BODY)
}

async fn json() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], JSON_BODY)
}

async fn malformed_json() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json; charset=utf-8")], MALFORMED_JSON_BODY)
}

async fn numbers() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], NUMBERS_JSON_BODY)
}

async fn repeated_bytes(Path(count): Path<usize>) -> Response {
    if count > MAX_BYTES {
        return (StatusCode::BAD_REQUEST, "too many bytes").into_response();
    }
    ([(CONTENT_TYPE, "text/plain")], "x".repeat(count)).into_response()
}

async fn duplicate_headers() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.append("x-dup", HeaderValue::from_static("one"));
    headers.append("x-dup", HeaderValue::from_static("two"));
    headers.insert("x-single", HeaderValue::from_static("a: b"));
    (headers, "ok")
}

async fn status(Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, format!("status {code}")).into_response(),
        Err(_) => (StatusCode::BAD_REQUEST, "invalid status").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echoed_request_roundtrips_through_json() {
        let echoed = EchoedRequest {
            method: "POST".to_string(),
            path: "/echo".to_string(),
            query: Some("a=1".to_string()),
            headers: vec![("x-a".to_string(), "1".to_string())],
            body: "hi".to_string(),
        };
        let json = serde_json::to_string(&echoed).unwrap();
        let back: EchoedRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, echoed);
    }

    #[test]
    fn header_values_ignore_case_and_keep_order() {
        let echoed = EchoedRequest {
            method: "GET".to_string(),
            path: "/echo".to_string(),
            query: None,
            headers: vec![
                ("x-a".to_string(), "1".to_string()),
                ("x-b".to_string(), "2".to_string()),
                ("x-a".to_string(), "3".to_string()),
            ],
            body: String::new(),
        };
        assert_eq!(echoed.header_values("X-A"), vec!["1", "3"]);
        assert!(echoed.header_values("x-c").is_empty());
    }
}
