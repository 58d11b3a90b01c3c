//! Response normalization shared by both transports.
//!
//! # Design
//! The two transports observe headers differently: one iterates a parsed
//! header map, the other only sees the raw `name: value` block a browser-style
//! `getAllResponseHeaders` returns. Both paths end in the same
//! `BTreeMap<String, String>` (lower-case names, last duplicate wins) and the
//! same body policy, so the resulting `ResponseData` cannot depend on which
//! transport produced it.

use std::collections::BTreeMap;

use crate::http::HttpResponse;
use crate::pretty::to_pretty_string;
use crate::response::ResponseData;

/// Lower-case header names; a later duplicate replaces an earlier one.
pub fn headers_from_pairs<I, K, V>(pairs: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
        .collect()
}

/// Render headers the way `getAllResponseHeaders` does: one
/// `name: value` line per entry, CRLF terminated.
pub fn render_header_block(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{name}: {value}\r\n"))
        .collect()
}

/// Parse a raw header block. Lines may end in CRLF or LF; the first `": "`
/// separates name from value and later ones stay in the value. Blank lines
/// are skipped.
pub fn parse_header_block(raw: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    for line in raw.trim().split(['\r', '\n']) {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(": ").unwrap_or((line, ""));
        headers.insert(name.to_ascii_lowercase(), value.to_string());
    }
    headers
}

/// Pretty-print `text` as `JSON.stringify(.., null, 2)` would when
/// `content_type` declares JSON and the text parses; otherwise return it
/// untouched.
pub fn normalize_body(content_type: Option<&str>, text: String) -> String {
    if !content_type.unwrap_or_default().starts_with("application/json") {
        return text;
    }
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => to_pretty_string(&value).unwrap_or(text),
        Err(_) => text,
    }
}

/// Assemble `ResponseData` from an already-normalized header map.
pub fn normalize_parts(status: u16, headers: BTreeMap<String, String>, body: String) -> ResponseData {
    let body = normalize_body(headers.get("content-type").map(String::as_str), body);
    ResponseData {
        status: status.to_string(),
        headers,
        body,
        timing: None,
    }
}

/// Normalize a transport response whose headers arrived as name/value pairs.
pub fn normalize_response(response: HttpResponse) -> ResponseData {
    normalize_parts(
        response.status,
        headers_from_pairs(response.headers),
        response.body,
    )
}
