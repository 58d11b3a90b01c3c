//! Declarative request description exchanged with the UI layer.
//!
//! # Design
//! The JSON shape mirrors the form state the UI edits: tagged unions use a
//! `type` field whose values are the literal strings the UI stores
//! (`"Basic"`, `"application/json"`, ...). Fields that do not belong to the
//! active variant are ignored on deserialization, so a schema that still
//! carries a stale `token` after switching to Basic auth is accepted and the
//! token is never used.

use serde::{Deserialize, Serialize};

/// A single key/value row from a params, headers or form-data table.
///
/// Rows with an empty `key` stay in the schema but are skipped when the
/// request is translated to the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// HTTP methods the request builder can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
        }
    }

    /// Only `POST` and `PUT` carry the schema's body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// Authentication settings. Exactly one strategy applies per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type")]
pub enum AuthConfig {
    #[default]
    #[serde(rename = "none")]
    None,
    Basic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },
    Bearer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },
}

/// Credentials usable for Basic auth: both halves present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl AuthConfig {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthConfig::Basic {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        AuthConfig::Bearer {
            token: Some(token.into()),
        }
    }

    /// Complete Basic credentials, or `None` when the strategy is not Basic
    /// or either half is missing.
    pub fn basic_credentials(&self) -> Option<BasicCredentials> {
        match self {
            AuthConfig::Basic {
                username: Some(username),
                password: Some(password),
            } if !username.is_empty() && !password.is_empty() => Some(BasicCredentials {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    /// Non-empty Bearer token, or `None`.
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            AuthConfig::Bearer { token: Some(token) } if !token.is_empty() => Some(token),
            _ => None,
        }
    }
}

/// Request payload. Each variant carries only its own content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestBody {
    #[serde(rename = "application/json")]
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        json: Option<String>,
    },
    #[serde(rename = "multipart/form-data")]
    FormData {
        #[serde(default, rename = "formData")]
        form_data: Vec<KeyValuePair>,
    },
    #[serde(rename = "text/plain")]
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
    },
}

impl Default for RequestBody {
    fn default() -> Self {
        RequestBody::Json { json: None }
    }
}

/// Everything needed to issue one HTTP request.
///
/// `url` is the origin and `path` is appended to it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSchema {
    pub method: HttpMethod,
    pub url: String,
    pub path: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub params: Vec<KeyValuePair>,
    #[serde(default)]
    pub headers: Vec<KeyValuePair>,
    #[serde(default)]
    pub body: RequestBody,
}

/// The schema a fresh request form starts from.
impl Default for RequestSchema {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            url: "https://yesno.wtf".to_string(),
            path: "/api".to_string(),
            auth: AuthConfig::None,
            params: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Json { json: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_matches_form_defaults() {
        let schema = RequestSchema::default();
        assert_eq!(schema.method, HttpMethod::Get);
        assert_eq!(schema.url, "https://yesno.wtf");
        assert_eq!(schema.path, "/api");
        assert_eq!(schema.auth, AuthConfig::None);
        assert!(schema.params.is_empty());
        assert!(schema.headers.is_empty());
        assert_eq!(schema.body, RequestBody::Json { json: None });
    }

    #[test]
    fn default_schema_serializes_to_ui_shape() {
        let json = serde_json::to_value(RequestSchema::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "method": "GET",
                "url": "https://yesno.wtf",
                "path": "/api",
                "auth": { "type": "none" },
                "params": [],
                "headers": [],
                "body": { "type": "application/json" }
            })
        );
    }

    #[test]
    fn schema_deserializes_from_ui_json() {
        let schema: RequestSchema = serde_json::from_str(
            r#"{
                "method": "POST",
                "url": "http://localhost:8080",
                "path": "/upload",
                "auth": { "type": "Bearer", "token": "abc" },
                "params": [{ "key": "q", "value": "1" }],
                "headers": [],
                "body": { "type": "multipart/form-data", "formData": [{ "key": "f", "value": "v" }] }
            }"#,
        )
        .unwrap();
        assert_eq!(schema.method, HttpMethod::Post);
        assert_eq!(schema.auth.bearer_token(), Some("abc"));
        assert_eq!(
            schema.body,
            RequestBody::FormData {
                form_data: vec![KeyValuePair::new("f", "v")]
            }
        );
    }

    #[test]
    fn irrelevant_auth_fields_are_ignored() {
        let auth: AuthConfig =
            serde_json::from_str(r#"{"type":"Basic","username":"u","password":"p","token":"t"}"#)
                .unwrap();
        assert_eq!(auth, AuthConfig::basic("u", "p"));
        assert!(auth.bearer_token().is_none());

        let auth: AuthConfig =
            serde_json::from_str(r#"{"type":"none","username":"u","password":"p"}"#).unwrap();
        assert_eq!(auth, AuthConfig::None);
        assert!(auth.basic_credentials().is_none());
    }

    #[test]
    fn basic_credentials_require_both_halves() {
        let partial = AuthConfig::Basic {
            username: Some("u".to_string()),
            password: None,
        };
        assert!(partial.basic_credentials().is_none());
        assert!(AuthConfig::basic("u", "").basic_credentials().is_none());
        assert_eq!(
            AuthConfig::basic("u", "p").basic_credentials(),
            Some(BasicCredentials {
                username: "u".to_string(),
                password: "p".to_string()
            })
        );
    }

    #[test]
    fn empty_bearer_token_is_ignored() {
        assert!(AuthConfig::bearer("").bearer_token().is_none());
        assert!(AuthConfig::Bearer { token: None }.bearer_token().is_none());
    }

    #[test]
    fn only_post_and_put_carry_a_body() {
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Put.carries_body());
        assert!(!HttpMethod::Get.carries_body());
        assert!(!HttpMethod::Delete.carries_body());
        assert!(!HttpMethod::Options.carries_body());
    }
}
