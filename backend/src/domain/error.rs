//! Domain error representation shared across adapters and services.
//!
//! Keep this module free from HTTP or framework concerns so the same error
//! shape can be mapped by any inbound adapter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

/// Stable machine-readable error code.
///
/// Mirrors the taxonomy every adapter classifies into exactly once at its
/// boundary; upper layers branch only on this code, never on adapter-specific
/// error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed identifier or URL.
    Validation,
    /// Identifier has no visible active endpoint.
    NotFound,
    /// Idempotent create with a differing URL.
    Conflict,
    /// Circuit open, bulkhead full, retry budget exceeded, draining, or an
    /// adapter outage that exhausted its retry budget.
    ServiceUnavailable,
    /// Programming error or invariant violation.
    InternalError,
}

/// Domain error payload returned by services and adapters.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
/// - `correlation_id`, when present, must be non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Error)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
#[error("{message}")]
pub struct Error {
    #[schema(example = "not_found")]
    code: ErrorCode,
    #[schema(example = "no active endpoint for route")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "01hzy8b2w6x5y7z9abcd1234")]
    correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// Errors raised constructing an [`Error`] itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
    EmptyCorrelationId,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
            Self::EmptyCorrelationId => write!(f, "correlation identifier must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error.
    ///
    /// # Panics
    /// Panics if `message` is empty once trimmed; use [`Self::try_new`] to
    /// handle this without panicking.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            correlation_id: None,
            details: None,
        })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier for tracing this error across systems.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Supplementary error details for clients.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a correlation identifier to the error.
    ///
    /// # Panics
    /// Panics if `id` is empty once trimmed.
    pub fn with_correlation_id(self, id: impl Into<String>) -> Self {
        match self.try_with_correlation_id(id) {
            Ok(value) => value,
            Err(err) => panic!("correlation identifiers must satisfy validation: {err}"),
        }
    }

    /// Fallible variant of [`Self::with_correlation_id`].
    pub fn try_with_correlation_id(
        mut self,
        id: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ErrorValidationError::EmptyCorrelationId);
        }
        self.correlation_id = Some(id);
        Ok(self)
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Redact server-side details so the payload is safe to expose to clients.
    ///
    /// Internal errors keep their code and correlation identifier but replace
    /// the message with a generic explanation and drop structured details.
    pub fn redacted_for_clients(&self) -> Self {
        if !matches!(self.code, ErrorCode::InternalError) {
            return self.clone();
        }
        let mut redacted = self.clone();
        redacted.message = "internal server error".to_string();
        redacted.details = None;
        redacted
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
            correlation_id: value.correlation_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            message,
            correlation_id,
            details,
        } = value;

        let mut error = Error::try_new(code, message)?;
        if let Some(id) = correlation_id {
            error = error.try_with_correlation_id(id)?;
        }
        error.details = details;
        Ok(error)
    }
}
