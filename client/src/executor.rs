//! Schema-in, response-out entry point.
//!
//! # Design
//! `Executor` owns one instance of each transport and carries no per-request
//! state, so a single executor can serve any number of concurrent calls.
//! Each call builds the wire request with the chosen transport's
//! `AuthPolicy`, dispatches it, and stamps the elapsed time on the result.

use std::time::Instant;

use apiprobe_core::{build_request, ExecuteError, RequestSchema, ResponseData};
use tracing::{debug, info};

use crate::config::ExecutorConfig;
use crate::fetch::FetchTransport;
use crate::transport::{Transport, TransportKind};
use crate::xhr::XhrTransport;

pub struct Executor {
    fetch: FetchTransport,
    xhr: XhrTransport,
    default_transport: TransportKind,
}

impl Executor {
    pub fn new(config: &ExecutorConfig) -> Result<Self, ExecuteError> {
        Ok(Self {
            fetch: FetchTransport::new(config)?,
            xhr: XhrTransport::new(config),
            default_transport: config.default_transport,
        })
    }

    pub fn from_env() -> Result<Self, ExecuteError> {
        Self::new(&ExecutorConfig::from_env()?)
    }

    pub fn default_transport(&self) -> TransportKind {
        self.default_transport
    }

    pub fn transport(&self, kind: TransportKind) -> &dyn Transport {
        match kind {
            TransportKind::Fetch => &self.fetch,
            TransportKind::Xhr => &self.xhr,
        }
    }

    /// Execute `schema` on the configured default transport.
    pub async fn execute(&self, schema: &RequestSchema) -> Result<ResponseData, ExecuteError> {
        self.execute_with(schema, self.default_transport).await
    }

    /// Execute `schema` on `kind`. The schema is only borrowed.
    pub async fn execute_with(
        &self,
        schema: &RequestSchema,
        kind: TransportKind,
    ) -> Result<ResponseData, ExecuteError> {
        let transport = self.transport(kind);
        let request = build_request(schema, transport.auth_policy());
        debug!(
            transport = %kind,
            method = request.method.as_str(),
            url = %request.url,
            headers = request.headers.len(),
            "dispatching request"
        );

        let started = Instant::now();
        let mut response = transport.send(request).await?;
        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        response.timing = Some(elapsed);

        info!(
            transport = %kind,
            status = %response.status,
            timing_ms = elapsed,
            "request completed"
        );
        Ok(response)
    }
}

/// One-shot convenience: execute `schema` with default settings on `kind`.
pub async fn execute(
    schema: &RequestSchema,
    kind: TransportKind,
) -> Result<ResponseData, ExecuteError> {
    Executor::new(&ExecutorConfig::default())?
        .execute_with(schema, kind)
        .await
}
