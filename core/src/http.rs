//! Wire-level request and response types shared by both transports.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values from a `RequestSchema` without touching
//! the network; a transport turns them into bytes on a socket and hands back
//! something the `normalize` module can turn into `ResponseData`.
//!
//! Headers are an ordered `Vec` rather than a map because duplicate names are
//! legal and must reach the transport in schema order.

use crate::schema::{BasicCredentials, HttpMethod};

/// Payload attached to a POST/PUT request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    /// Sent as-is. The matching `Content-Type` is already in the headers.
    Text(String),
    /// Encoded by the transport, which also chooses the boundary and sets
    /// `Content-Type`.
    Multipart(Vec<(String, String)>),
}

/// An HTTP request described as plain data.
///
/// Built by `build_request`. `credentials` is only populated when the
/// transport asked for connection-level Basic auth; in that case no
/// `Authorization` header is present for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestPayload>,
    pub credentials: Option<BasicCredentials>,
}

impl HttpRequest {
    /// All values for `name`, compared case-insensitively, in insertion order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A transport-level response before normalization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
