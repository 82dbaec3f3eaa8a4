//! Classification of API responses.

use serde_json::{Map, Value};

use super::{TransportError, TransportResponse};

const DEFAULT_ERROR_CODE: &str = "UNKNOWN_ERROR";
const DEFAULT_VALIDATION_MESSAGE: &str = "Validation failed";
const DEFAULT_SERVER_MESSAGE: &str = "Internal server error";

/// A 4xx answer: the request itself was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{error_code}: {message} (status {status})")]
pub struct ValidationFailure {
    pub status: u16,
    /// Machine-readable code from the body's `code` field.
    pub error_code: String,
    pub message: String,
    /// Field-level details from the body's `errors` field, if any.
    pub errors: Option<Value>,
    pub raw: Value,
}

impl ValidationFailure {
    pub fn from_response(status: u16, body: Value) -> Self {
        Self {
            status,
            error_code: string_field(&body, "code").unwrap_or(DEFAULT_ERROR_CODE).to_owned(),
            message: string_field(&body, "message")
                .unwrap_or(DEFAULT_VALIDATION_MESSAGE)
                .to_owned(),
            errors: body.get("errors").filter(|v| !v.is_null()).cloned(),
            raw: body,
        }
    }
}

/// A 5xx answer, or no answer at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ServerFailure {
    /// `None` when the request never produced a response.
    pub status: Option<u16>,
    pub message: String,
    pub raw: Option<Value>,
}

impl ServerFailure {
    pub fn from_response(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            message: string_field(&body, "message")
                .unwrap_or(DEFAULT_SERVER_MESSAGE)
                .to_owned(),
            raw: Some(body),
        }
    }

    pub fn transport(error: &TransportError) -> Self {
        Self {
            status: None,
            message: format!("API request failed: {error}"),
            raw: None,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.status.is_none()
    }
}

/// Outcome of one logical API call. Exactly one variant is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult {
    Success { status: u16, body: Value },
    ValidationFailure(ValidationFailure),
    ServerFailure(ServerFailure),
}

impl ApiResult {
    /// Classify the final attempt of a call.
    pub fn classify(outcome: Result<TransportResponse, TransportError>) -> Self {
        match outcome {
            Ok(response) => Self::from_response(response),
            Err(e) => ApiResult::ServerFailure(ServerFailure::transport(&e)),
        }
    }

    fn from_response(response: TransportResponse) -> Self {
        let status = response.status.as_u16();
        let body = parse_body(&response.body);
        match status {
            0..400 => ApiResult::Success { status, body },
            400..500 => ApiResult::ValidationFailure(ValidationFailure::from_response(status, body)),
            _ => ApiResult::ServerFailure(ServerFailure::from_response(status, body)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResult::Success { .. })
    }

    /// HTTP status of the final response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiResult::Success { status, .. } => Some(*status),
            ApiResult::ValidationFailure(failure) => Some(failure.status),
            ApiResult::ServerFailure(failure) => failure.status,
        }
    }

    pub fn into_result(self) -> Result<Value, ApiError> {
        match self {
            ApiResult::Success { body, .. } => Ok(body),
            ApiResult::ValidationFailure(failure) => Err(ApiError::Validation(failure)),
            ApiResult::ServerFailure(failure) => Err(ApiError::Server(failure)),
        }
    }
}

/// Error form of a failed [`ApiResult`], for `?` propagation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(ValidationFailure),
    #[error("server error: {0}")]
    Server(ServerFailure),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Validation(failure) => Some(failure.status),
            ApiError::Server(failure) => failure.status,
        }
    }

    /// The gateway's error code, for validation failures.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            ApiError::Validation(failure) => Some(&failure.error_code),
            ApiError::Server(_) => None,
        }
    }
}

/// An absent, empty, or non-JSON body reads as an empty object.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Object(Map::new());
    }
    match serde_json::from_slice(bytes) {
        Ok(Value::Null) => Value::Object(Map::new()),
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "response body is not valid JSON");
            Value::Object(Map::new())
        }
    }
}

fn string_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}
