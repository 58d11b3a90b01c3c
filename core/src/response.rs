//! Normalized response handed back to the UI layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Transport-independent view of a completed request.
///
/// Both transports produce this shape for the same exchange: `status` is the
/// decimal status code, header names are lower-case with the last duplicate
/// winning, and `body` is always text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    pub status: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Milliseconds between dispatch and completion, when measured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<u64>,
}

impl ResponseData {
    /// Status code parsed back from its string form.
    pub fn status_code(&self) -> Option<u16> {
        self.status.parse().ok()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}
