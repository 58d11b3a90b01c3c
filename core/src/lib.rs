//! I/O-free core of the API request builder.
//!
//! # Overview
//! Translates a declarative `RequestSchema` into a wire-level `HttpRequest`
//! and turns transport responses into a uniform `ResponseData`. Executing
//! the round-trip is left to the transports in `apiprobe-client`, which keeps
//! everything here deterministic and testable without a network.
//!
//! # Design
//! - `schema` holds the data contract the UI layer edits and serializes.
//! - `builder` owns URL, header, auth and body translation. The Basic-auth
//!   channel is an explicit `AuthPolicy` argument.
//! - `normalize` owns header folding and the JSON pretty-print fallback;
//!   `pretty` prints numbers the way a JavaScript host does.
//! - Types use owned `String` / `Vec` fields so they can cross the FFI layer.

pub mod builder;
pub mod error;
pub mod http;
pub mod normalize;
pub mod pretty;
pub mod response;
pub mod schema;

pub use builder::{build_query_string, build_request, build_url, AuthPolicy};
pub use error::ExecuteError;
pub use http::{HttpRequest, HttpResponse, RequestPayload};
pub use response::ResponseData;
pub use schema::{AuthConfig, BasicCredentials, HttpMethod, KeyValuePair, RequestBody, RequestSchema};
