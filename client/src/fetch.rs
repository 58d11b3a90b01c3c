//! Fetch-style transport built on reqwest.
//!
//! # Design
//! Mirrors a browser `fetch` call: the request is awaited directly, response
//! headers are read from the parsed header map, and Basic credentials are
//! sent as an `Authorization` header built by the core. Every reqwest error,
//! whether from sending or reading the body, collapses into
//! `ExecuteError::RequestFailed`; the cause goes to the log only.

use apiprobe_core::normalize::{headers_from_pairs, normalize_parts};
use apiprobe_core::{AuthPolicy, ExecuteError, HttpMethod, HttpRequest, RequestPayload, ResponseData};
use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, Method};
use tracing::{debug, warn};

use crate::config::ExecutorConfig;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct FetchTransport {
    client: Client,
}

impl FetchTransport {
    pub fn new(config: &ExecutorConfig) -> Result<Self, ExecuteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExecuteError::Config(e.to_string()))?;
        Ok(Self { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Options => Method::OPTIONS,
    }
}

fn failed(stage: &'static str) -> impl FnOnce(reqwest::Error) -> ExecuteError {
    move |e| {
        warn!(error = %e, stage, "fetch transport failed");
        ExecuteError::RequestFailed
    }
}

#[async_trait]
impl Transport for FetchTransport {
    fn auth_policy(&self) -> AuthPolicy {
        AuthPolicy::AuthorizationHeader
    }

    async fn send(&self, request: HttpRequest) -> Result<ResponseData, ExecuteError> {
        let mut builder = self.client.request(method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match request.body {
            Some(RequestPayload::Text(text)) => builder.body(text),
            Some(RequestPayload::Multipart(fields)) => {
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value));
                builder.multipart(form)
            }
            None => builder,
        };

        let response = builder.send().await.map_err(failed("send"))?;
        let status = response.status().as_u16();
        let headers = headers_from_pairs(response.headers().iter().map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        }));
        debug!(status, "fetch transport received response headers");

        let text = response.text().await.map_err(failed("read body"))?;
        Ok(normalize_parts(status, headers, text))
    }
}
