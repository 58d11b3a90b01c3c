//! Translation of a `RequestSchema` into a wire-level `HttpRequest`.
//!
//! # Design
//! Building is pure and shared by both transports so that URL, header and
//! body handling cannot drift between them. The one place the transports
//! legitimately differ, where Basic credentials travel, is a parameter
//! (`AuthPolicy`) chosen by the transport rather than a branch hidden inside
//! it.

use base64::{engine::general_purpose, Engine};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::http::{HttpRequest, RequestPayload};
use crate::schema::{KeyValuePair, RequestBody, RequestSchema};

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

// Characters left alone by `encodeURIComponent`.
const QUERY_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Where a transport sends complete Basic credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// `Authorization: Basic ...` is appended to the request headers.
    AuthorizationHeader,
    /// Credentials ride on `HttpRequest::credentials` and the transport
    /// presents them at the connection level.
    ConnectionCredentials,
}

/// `key=value&...` for every param with a non-empty key, values
/// percent-encoded. Keys are emitted verbatim.
pub fn build_query_string(params: &[KeyValuePair]) -> String {
    params
        .iter()
        .filter(|p| !p.key.is_empty())
        .map(|p| {
            format!(
                "{}={}",
                p.key,
                utf8_percent_encode(&p.value, QUERY_VALUE_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// `url + path`, plus `?query` when any param survives filtering.
pub fn build_url(schema: &RequestSchema) -> String {
    let query = build_query_string(&schema.params);
    if query.is_empty() {
        format!("{}{}", schema.url, schema.path)
    } else {
        format!("{}{}?{}", schema.url, schema.path, query)
    }
}

/// Build the wire request for `schema`.
pub fn build_request(schema: &RequestSchema, policy: AuthPolicy) -> HttpRequest {
    let mut headers: Vec<(String, String)> = schema
        .headers
        .iter()
        .filter(|h| !h.key.is_empty())
        .map(|h| (h.key.clone(), h.value.clone()))
        .collect();

    let mut credentials = None;
    if let Some(basic) = schema.auth.basic_credentials() {
        match policy {
            AuthPolicy::AuthorizationHeader => {
                let encoded = general_purpose::STANDARD
                    .encode(format!("{}:{}", basic.username, basic.password));
                headers.push(("Authorization".to_string(), format!("Basic {encoded}")));
            }
            AuthPolicy::ConnectionCredentials => credentials = Some(basic),
        }
    } else if let Some(token) = schema.auth.bearer_token() {
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }

    let body = if schema.method.carries_body() {
        Some(encode_body(&schema.body, &mut headers))
    } else {
        None
    };

    HttpRequest {
        method: schema.method,
        url: build_url(schema),
        headers,
        body,
        credentials,
    }
}

fn encode_body(body: &RequestBody, headers: &mut Vec<(String, String)>) -> RequestPayload {
    match body {
        RequestBody::Json { json } => {
            set_content_type(headers, CONTENT_TYPE_JSON);
            RequestPayload::Text(json.clone().unwrap_or_default())
        }
        RequestBody::FormData { form_data } => {
            // The transport adds the boundary type; it must be the only one.
            remove_content_type(headers);
            RequestPayload::Multipart(
                form_data
                    .iter()
                    .filter(|f| !f.key.is_empty())
                    .map(|f| (f.key.clone(), f.value.clone()))
                    .collect(),
            )
        }
        RequestBody::Text { raw } => {
            set_content_type(headers, CONTENT_TYPE_TEXT);
            RequestPayload::Text(raw.clone().unwrap_or_default())
        }
    }
}

fn remove_content_type(headers: &mut Vec<(String, String)>) {
    headers.retain(|(key, _)| !key.eq_ignore_ascii_case("content-type"));
}

/// Replace every existing `Content-Type` entry with `value`.
fn set_content_type(headers: &mut Vec<(String, String)>, value: &str) {
    remove_content_type(headers);
    headers.push(("Content-Type".to_string(), value.to_string()));
}
