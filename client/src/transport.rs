//! The transport seam: one interface, two network back ends.

use std::fmt;
use std::str::FromStr;

use apiprobe_core::{AuthPolicy, ExecuteError, HttpRequest, ResponseData};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sends a built request and returns the normalized response.
///
/// Implementations must agree on the `ResponseData` they produce for the same
/// exchange. They may differ only in where Basic credentials travel, which
/// each one declares through `auth_policy`.
#[async_trait]
pub trait Transport: Send + Sync {
    fn auth_policy(&self) -> AuthPolicy;

    async fn send(&self, request: HttpRequest) -> Result<ResponseData, ExecuteError>;
}

/// Selects which transport executes a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Async client; Basic auth as an `Authorization` header.
    Fetch,
    /// Callback-completed client; Basic auth as connection credentials.
    #[default]
    Xhr,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Fetch => "fetch",
            TransportKind::Xhr => "xhr",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportKind {
    type Err = ExecuteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fetch" => Ok(TransportKind::Fetch),
            "xhr" => Ok(TransportKind::Xhr),
            other => Err(ExecuteError::Config(format!("unknown transport: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_is_xhr() {
        assert_eq!(TransportKind::default(), TransportKind::Xhr);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("FETCH".parse::<TransportKind>().unwrap(), TransportKind::Fetch);
        assert_eq!(" xhr ".parse::<TransportKind>().unwrap(), TransportKind::Xhr);
        assert!(matches!(
            "curl".parse::<TransportKind>(),
            Err(ExecuteError::Config(_))
        ));
    }
}
