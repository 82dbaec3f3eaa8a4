//! Outbound request description.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

/// HTTP verbs used by the Toss Payments API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_http(&self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Errors raised while assembling a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("endpoint path must be relative: {0}")]
    InvalidPath(String),
    #[error("request body must be a JSON object")]
    BodyNotObject,
}

/// One logical API call.
///
/// `path` is relative to `{base_url}/{version}/`. For `GET` the body entries
/// are sent as query parameters, for `POST` as a JSON object in insertion
/// order.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    path: String,
    body: Map<String, Value>,
    headers: HeaderMap,
}

impl OutboundRequest {
    pub fn builder(method: Method, path: impl Into<String>) -> OutboundRequestBuilder {
        OutboundRequestBuilder {
            method,
            path: path.into(),
            body: Map::new(),
            headers: HeaderMap::new(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Query pairs for a `GET` request. Strings are sent verbatim, other
    /// values as their JSON text; `null` entries are skipped.
    pub(crate) fn query_pairs(&self) -> impl Iterator<Item = (&str, String)> {
        self.body.iter().filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key.as_str(), s.clone())),
            other => Some((key.as_str(), other.to_string())),
        })
    }
}

/// Builder for [`OutboundRequest`]. The path is validated in
/// [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct OutboundRequestBuilder {
    method: Method,
    path: String,
    body: Map<String, Value>,
    headers: HeaderMap,
}

impl OutboundRequestBuilder {
    /// Append a body field.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Append every entry of `body`.
    pub fn params(mut self, body: Map<String, Value>) -> Self {
        self.body.extend(body);
        self
    }

    /// Use a serializable struct as the body. It must serialize to an object.
    pub fn json<T: serde::Serialize>(self, body: &T) -> Result<Self, BuilderError> {
        match serde_json::to_value(body) {
            Ok(Value::Object(map)) => Ok(self.params(map)),
            _ => Err(BuilderError::BodyNotObject),
        }
    }

    /// Add a request-specific header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Reject empty paths and anything that could leave `{base_url}/{version}/`:
    /// schemes, query or fragment markers, backslashes and dot segments.
    pub fn build(self) -> Result<OutboundRequest, BuilderError> {
        let trimmed = self.path.trim_start_matches('/');
        if trimmed.is_empty() {
            return Err(BuilderError::MissingField("path"));
        }
        if trimmed.contains("://")
            || trimmed.contains(['?', '#', '\\'])
            || trimmed.split('/').any(is_dot_segment)
        {
            return Err(BuilderError::InvalidPath(self.path));
        }
        Ok(OutboundRequest {
            method: self.method,
            path: trimmed.to_owned(),
            body: self.body,
            headers: self.headers,
        })
    }
}

/// Trim `value` and fail with `MissingField(field)` when nothing is left.
pub(crate) fn required<'v>(field: &'static str, value: &'v str) -> Result<&'v str, BuilderError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BuilderError::MissingField(field));
    }
    Ok(value)
}

/// A required identifier, percent-encoded for use as one path segment.
pub(crate) fn path_segment(field: &'static str, value: &str) -> Result<String, BuilderError> {
    let value = required(field, value)?;
    if is_dot_segment(value) {
        return Err(BuilderError::InvalidPath(value.to_owned()));
    }
    Ok(urlencoding::encode(value).into_owned())
}

/// `.` and `..`, including the percent-encoded forms URL parsers resolve.
fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().replace("%2e", ".").as_str(),
        "." | ".."
    )
}
