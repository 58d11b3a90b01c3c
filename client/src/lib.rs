//! Request execution over two interchangeable transports.
//!
//! # Overview
//! `Executor` takes a `RequestSchema`, builds the wire request through
//! `apiprobe-core`, sends it with either the fetch-style transport (reqwest,
//! async) or the xhr-style transport (ureq, callback-completed), and returns
//! a normalized `ResponseData`.
//!
//! # Design
//! - Both transports implement `Transport`; they produce the same
//!   `ResponseData` for the same exchange.
//! - They differ in one documented way: the fetch transport sends Basic
//!   credentials as an `Authorization` header, the xhr transport presents
//!   them at the connection level in answer to a Basic challenge.
//! - Every transport error surfaces as `ExecuteError::RequestFailed`; the
//!   cause is logged via `tracing`.

pub mod config;
pub mod executor;
pub mod fetch;
pub mod multipart;
pub mod transport;
pub mod xhr;

pub use apiprobe_core::{ExecuteError, RequestSchema, ResponseData};
pub use config::ExecutorConfig;
pub use executor::{execute, Executor};
pub use fetch::FetchTransport;
pub use transport::{Transport, TransportKind};
pub use xhr::{XhrCompletion, XhrFailure, XhrTransport};
