//! # Error Classifier
//!
//! Normalizes every failure the client can observe into a single [`ParsedError`]
//! shape and maps error codes onto user-facing advisory text and retry/re-auth
//! policy. Classification is total and deterministic: any input yields a
//! `ParsedError`, and classifying a `ParsedError` again yields the same code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::ClientError;

/// Advisory shown for transport-level failures.
pub const NETWORK_ADVISORY: &str =
    "Unable to connect to the server. Please check your internet connection.";

const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred";
const API_FALLBACK_CODE: &str = "API_ERROR";
const API_FALLBACK_MESSAGE: &str = "An API error occurred";
const GENERIC_ADVISORY: &str = "An unexpected error occurred. Please try again.";

/// Error code taxonomy.
///
/// Codes outside the known set are preserved verbatim in [`ErrorCode::Other`]
/// so server-defined codes survive classification unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    ValidationError,
    ResourceNotFound,
    NetworkError,
    Unauthorized,
    Forbidden,
    InternalServerError,
    TypeMismatch,
    ConstraintViolation,
    BusinessValidationError,
    MalformedRequest,
    TimeoutError,
    RuntimeError,
    StringError,
    UnknownError,
    HttpError,
    Other(String),
}

impl ErrorCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
            Self::BusinessValidationError => "BUSINESS_VALIDATION_ERROR",
            Self::MalformedRequest => "MALFORMED_REQUEST",
            Self::TimeoutError => "TIMEOUT_ERROR",
            Self::RuntimeError => "RUNTIME_ERROR",
            Self::StringError => "STRING_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::HttpError => "HTTP_ERROR",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "VALIDATION_ERROR" => Self::ValidationError,
            "RESOURCE_NOT_FOUND" => Self::ResourceNotFound,
            "NETWORK_ERROR" => Self::NetworkError,
            "UNAUTHORIZED" => Self::Unauthorized,
            "FORBIDDEN" => Self::Forbidden,
            "INTERNAL_SERVER_ERROR" => Self::InternalServerError,
            "TYPE_MISMATCH" => Self::TypeMismatch,
            "CONSTRAINT_VIOLATION" => Self::ConstraintViolation,
            "BUSINESS_VALIDATION_ERROR" => Self::BusinessValidationError,
            "MALFORMED_REQUEST" => Self::MalformedRequest,
            "TIMEOUT_ERROR" => Self::TimeoutError,
            "RUNTIME_ERROR" => Self::RuntimeError,
            "STRING_ERROR" => Self::StringError,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "HTTP_ERROR" => Self::HttpError,
            _ => Self::Other(code),
        }
    }
}

impl From<&str> for ErrorCode {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ErrorCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Structured error body returned by the organizer API on failure.
///
/// `{ "error": { "code", "message", "timestamp", "path", "details"? } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// The raw value a [`ParsedError`] was built from.
#[derive(Debug, Clone, PartialEq)]
pub enum OriginalCause {
    /// A JSON payload (structured error body or an arbitrary value)
    Payload(Value),
    /// The rendered message of an exception-like failure
    Message(String),
}

/// Normalized error record surfaced to callers and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{code}: {message}")]
pub struct ParsedError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip)]
    pub original_cause: Option<OriginalCause>,
}

impl ParsedError {
    pub fn new(code: impl Into<ErrorCode>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            original_cause: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Synthetic error for a non-success response whose body was not the
    /// structured error shape.
    pub fn from_status(status: u16, reason: &str) -> Self {
        let code = match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::ResourceNotFound,
            408 | 504 => ErrorCode::TimeoutError,
            500..=599 => ErrorCode::InternalServerError,
            _ => ErrorCode::HttpError,
        };
        let message = if reason.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {reason}")
        };
        Self::new(code, message).with_details(serde_json::json!({ "status": status }))
    }

    /// Fixed advisory sentence for this error's code
    pub fn advisory(&self) -> &'static str {
        user_message(&self.code)
    }

    pub fn is_retryable(&self) -> bool {
        is_retryable(&self.code)
    }

    pub fn requires_reauth(&self) -> bool {
        requires_reauth(&self.code)
    }

    /// Render back into the structured error body shape.
    pub fn to_api_error(&self) -> ApiErrorBody {
        ApiErrorBody {
            error: ApiErrorDetail {
                code: Some(self.code.to_string()),
                message: self.message.clone(),
                timestamp: None,
                path: None,
                details: self.details.clone(),
            },
        }
    }
}

/// Any failure value the client may need to classify.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Already classified
    Parsed(ParsedError),
    /// Decoded structured error body
    Api(ApiErrorBody),
    /// The transport failed before any response arrived
    Network(String),
    /// A local runtime failure with its own message
    Runtime(String),
    /// A bare string
    Text(String),
    /// Arbitrary JSON; inspected for the structured shape
    Payload(Value),
}

impl From<ParsedError> for Failure {
    fn from(error: ParsedError) -> Self {
        Self::Parsed(error)
    }
}

impl From<ApiErrorBody> for Failure {
    fn from(body: ApiErrorBody) -> Self {
        Self::Api(body)
    }
}

impl From<reqwest::Error> for Failure {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() || error.is_builder() {
            Self::Runtime(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for Failure {
    fn from(error: serde_json::Error) -> Self {
        Self::Runtime(error.to_string())
    }
}

impl From<ClientError> for Failure {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::HttpError(e) => Self::from(e),
            ClientError::ApiError(parsed) => Self::Parsed(parsed),
            other => Self::Runtime(other.to_string()),
        }
    }
}

impl From<String> for Failure {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Failure {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for Failure {
    fn from(value: Value) -> Self {
        Self::Payload(value)
    }
}

/// Classify any failure into a [`ParsedError`].
///
/// Priority: structured error body, transport failure, runtime failure,
/// plain string, anything else.
pub fn classify(raw: impl Into<Failure>) -> ParsedError {
    match raw.into() {
        Failure::Parsed(parsed) => parsed,
        Failure::Api(body) => from_api_detail(body.error, None),
        Failure::Network(detail) => ParsedError {
            code: ErrorCode::NetworkError,
            message: NETWORK_ADVISORY.to_string(),
            details: None,
            original_cause: Some(OriginalCause::Message(detail)),
        },
        Failure::Runtime(message) => ParsedError {
            code: ErrorCode::RuntimeError,
            message: if message.trim().is_empty() {
                UNEXPECTED_MESSAGE.to_string()
            } else {
                message.clone()
            },
            details: None,
            original_cause: Some(OriginalCause::Message(message)),
        },
        Failure::Text(text) => ParsedError {
            code: ErrorCode::StringError,
            message: text.clone(),
            details: None,
            original_cause: Some(OriginalCause::Message(text)),
        },
        Failure::Payload(value) => classify_payload(value),
    }
}

fn classify_payload(value: Value) -> ParsedError {
    if let Some(detail) = structured_detail(&value) {
        return from_api_detail(detail, Some(value));
    }

    if let Value::String(text) = &value {
        return ParsedError {
            code: ErrorCode::StringError,
            message: text.clone(),
            details: None,
            original_cause: Some(OriginalCause::Payload(value)),
        };
    }

    ParsedError {
        code: ErrorCode::UnknownError,
        message: UNEXPECTED_MESSAGE.to_string(),
        details: None,
        original_cause: Some(OriginalCause::Payload(value)),
    }
}

/// Matches `{ error: { message, ... } }` where `error` is an object.
fn structured_detail(value: &Value) -> Option<ApiErrorDetail> {
    let error: &Map<String, Value> = value.get("error")?.as_object()?;
    let message = error.get("message")?;

    let text_field = |key: &str| error.get(key).and_then(Value::as_str).map(str::to_string);

    Some(ApiErrorDetail {
        code: text_field("code"),
        message: message.as_str().unwrap_or_default().to_string(),
        timestamp: text_field("timestamp"),
        path: text_field("path"),
        details: error.get("details").filter(|d| !d.is_null()).cloned(),
    })
}

fn from_api_detail(detail: ApiErrorDetail, payload: Option<Value>) -> ParsedError {
    let code = detail
        .code
        .clone()
        .filter(|code| !code.is_empty())
        .unwrap_or_else(|| API_FALLBACK_CODE.to_string());
    let message = if detail.message.is_empty() {
        API_FALLBACK_MESSAGE.to_string()
    } else {
        detail.message.clone()
    };
    let details = detail.details.clone();
    let cause = payload.unwrap_or_else(|| {
        serde_json::to_value(ApiErrorBody { error: detail }).unwrap_or(Value::Null)
    });

    ParsedError {
        code: ErrorCode::from(code),
        message,
        details,
        original_cause: Some(OriginalCause::Payload(cause)),
    }
}

/// User-facing advisory sentence for a code
pub fn user_message(code: &ErrorCode) -> &'static str {
    match code {
        ErrorCode::ValidationError => "Please check the form for errors and try again.",
        ErrorCode::ResourceNotFound => "The requested item could not be found.",
        ErrorCode::NetworkError => NETWORK_ADVISORY,
        ErrorCode::Unauthorized => "You need to sign in to access this feature.",
        ErrorCode::Forbidden => "You do not have permission to perform this action.",
        ErrorCode::InternalServerError => "A server error occurred. Please try again later.",
        ErrorCode::TypeMismatch => "Invalid data format. Please check your input.",
        ErrorCode::ConstraintViolation => "The data provided does not meet the requirements.",
        ErrorCode::BusinessValidationError => {
            "The operation could not be completed due to business rules."
        }
        ErrorCode::MalformedRequest => "Invalid request format. Please try again.",
        _ => GENERIC_ADVISORY,
    }
}

/// True only for codes worth an automatic retry
pub fn is_retryable(code: &ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::NetworkError | ErrorCode::InternalServerError | ErrorCode::TimeoutError
    )
}

/// True only for codes that mean the session must be re-established
pub fn requires_reauth(code: &ErrorCode) -> bool {
    match code {
        ErrorCode::Unauthorized => true,
        ErrorCode::Other(code) => code == "401",
        _ => false,
    }
}

/// Field-level messages carried by a VALIDATION_ERROR, if any.
pub fn extract_validation_errors(error: &ParsedError) -> BTreeMap<String, String> {
    if error.code != ErrorCode::ValidationError {
        return BTreeMap::new();
    }

    match &error.details {
        Some(Value::Object(fields)) => fields
            .iter()
            .map(|(field, message)| {
                let message = match message {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (field.clone(), message)
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_body_is_used_verbatim() {
        let raw = json!({
            "error": {
                "code": "RESOURCE_NOT_FOUND",
                "message": "Project not found with id: missing-id",
                "timestamp": "2024-05-01T10:00:00",
                "path": "/api/v1/projects/missing-id",
                "details": { "resourceType": "Project", "resourceId": "missing-id" }
            }
        });

        let parsed = classify(raw.clone());
        assert_eq!(parsed.code, ErrorCode::ResourceNotFound);
        assert_eq!(parsed.message, "Project not found with id: missing-id");
        assert_eq!(parsed.details.unwrap()["resourceId"], "missing-id");
        assert_eq!(parsed.original_cause, Some(OriginalCause::Payload(raw)));
    }

    #[test]
    fn test_structured_body_without_code_falls_back_to_api_error() {
        let parsed = classify(json!({ "error": { "message": "boom" } }));
        assert_eq!(parsed.code, ErrorCode::Other("API_ERROR".to_string()));
        assert_eq!(parsed.message, "boom");
    }

    #[test]
    fn test_error_without_message_is_not_structured() {
        let parsed = classify(json!({ "error": { "code": "FORBIDDEN" } }));
        assert_eq!(parsed.code, ErrorCode::UnknownError);
    }

    #[test]
    fn test_network_failure() {
        let parsed = classify(Failure::Network("connection refused".to_string()));
        assert_eq!(parsed.code, ErrorCode::NetworkError);
        assert_eq!(parsed.message, NETWORK_ADVISORY);
        assert!(parsed.is_retryable());
    }

    #[test]
    fn test_runtime_failure_uses_own_message_or_fallback() {
        let parsed = classify(Failure::Runtime("expected value at line 1".to_string()));
        assert_eq!(parsed.code, ErrorCode::RuntimeError);
        assert_eq!(parsed.message, "expected value at line 1");

        let parsed = classify(Failure::Runtime(String::new()));
        assert_eq!(parsed.message, "An unexpected error occurred");
    }

    #[test]
    fn test_serde_error_is_runtime() {
        let err = serde_json::from_str::<u32>("not a number").unwrap_err();
        assert_eq!(classify(err).code, ErrorCode::RuntimeError);
    }

    #[test]
    fn test_string_failure() {
        let parsed = classify("quota exceeded");
        assert_eq!(parsed.code, ErrorCode::StringError);
        assert_eq!(parsed.message, "quota exceeded");

        let parsed = classify(json!("quota exceeded"));
        assert_eq!(parsed.code, ErrorCode::StringError);
    }

    #[test]
    fn test_unknown_values() {
        for raw in [json!(null), json!(42), json!([1, 2]), json!({ "status": 500 })] {
            let parsed = classify(raw);
            assert_eq!(parsed.code, ErrorCode::UnknownError);
            assert_eq!(parsed.message, "An unexpected error occurred");
        }
    }

    #[test]
    fn test_classify_is_idempotent() {
        let first = classify(json!({
            "error": { "code": "VALIDATION_ERROR", "message": "bad", "details": { "title": "required" } }
        }));
        let again = classify(first.clone());
        assert_eq!(again, first);

        let via_body = classify(serde_json::to_value(first.to_api_error()).unwrap());
        assert_eq!(via_body.code, first.code);
        assert_eq!(via_body.message, first.message);
        assert_eq!(via_body.details, first.details);
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            user_message(&ErrorCode::ResourceNotFound),
            "The requested item could not be found."
        );
        assert_eq!(
            user_message(&ErrorCode::Unauthorized),
            "You need to sign in to access this feature."
        );
        assert_eq!(
            user_message(&ErrorCode::from("SOMETHING_NEW")),
            "An unexpected error occurred. Please try again."
        );
        assert_eq!(
            user_message(&ErrorCode::StringError),
            "An unexpected error occurred. Please try again."
        );
    }

    #[test]
    fn test_retry_and_reauth_policy() {
        assert!(is_retryable(&ErrorCode::NetworkError));
        assert!(is_retryable(&ErrorCode::InternalServerError));
        assert!(is_retryable(&ErrorCode::TimeoutError));
        assert!(!is_retryable(&ErrorCode::Unauthorized));
        assert!(!is_retryable(&ErrorCode::ValidationError));

        assert!(requires_reauth(&ErrorCode::Unauthorized));
        assert!(requires_reauth(&ErrorCode::from("401")));
        assert!(!requires_reauth(&ErrorCode::Forbidden));
        assert!(!requires_reauth(&ErrorCode::NetworkError));
    }

    #[test]
    fn test_status_fallbacks() {
        assert_eq!(ParsedError::from_status(401, "Unauthorized").code, ErrorCode::Unauthorized);
        assert_eq!(ParsedError::from_status(403, "Forbidden").code, ErrorCode::Forbidden);
        assert_eq!(ParsedError::from_status(404, "Not Found").code, ErrorCode::ResourceNotFound);
        assert_eq!(ParsedError::from_status(504, "Gateway Timeout").code, ErrorCode::TimeoutError);
        assert_eq!(
            ParsedError::from_status(502, "Bad Gateway").code,
            ErrorCode::InternalServerError
        );

        let teapot = ParsedError::from_status(418, "I'm a teapot");
        assert_eq!(teapot.code, ErrorCode::HttpError);
        assert_eq!(teapot.message, "HTTP 418: I'm a teapot");
        assert_eq!(teapot.details, Some(json!({ "status": 418 })));
    }

    #[test]
    fn test_extract_validation_errors() {
        let parsed = classify(json!({
            "error": {
                "code": "VALIDATION_ERROR",
                "message": "Validation failed for one or more fields",
                "details": { "title": "must not be blank", "energyLevel": 7 }
            }
        }));
        let fields = extract_validation_errors(&parsed);
        assert_eq!(fields.get("title").map(String::as_str), Some("must not be blank"));
        assert_eq!(fields.get("energyLevel").map(String::as_str), Some("7"));

        let other = ParsedError::new(ErrorCode::Forbidden, "no").with_details(json!({ "a": "b" }));
        assert!(extract_validation_errors(&other).is_empty());
    }

    #[test]
    fn test_error_code_serde() {
        let json = serde_json::to_string(&ErrorCode::BusinessValidationError).unwrap();
        assert_eq!(json, "\"BUSINESS_VALIDATION_ERROR\"");

        let parsed: ErrorCode = serde_json::from_str("\"INVALID_ARGUMENT\"").unwrap();
        assert_eq!(parsed, ErrorCode::Other("INVALID_ARGUMENT".to_string()));
        assert_eq!(parsed.to_string(), "INVALID_ARGUMENT");
    }
}
