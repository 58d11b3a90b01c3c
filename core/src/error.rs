//! Error surface of the request executor.
//!
//! # Design
//! Callers get a single failure kind for anything that goes wrong on the
//! wire: connection refused, TLS failure, malformed response, invalid header
//! name. The underlying cause is reported through `tracing` by the transport
//! and deliberately not carried here, so both transports present the same
//! contract no matter which library produced the error.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    /// The request could not be completed. No further detail is exposed.
    #[error("Request failed")]
    RequestFailed,

    /// A transport could not be constructed from the supplied configuration.
    #[error("invalid executor configuration: {0}")]
    Config(String),
}
