//! The per-request correlation identifier, bound at the HTTP boundary and
//! carried through adapters, logs, events, and audit documents.
//!
//! The context itself is just a validated string; propagation without
//! signature plumbing is achieved by storing it in Actix request extensions
//! (see `inbound::http::correlation`) rather than by anything in this module.
//! Consumers and background tasks that are not request-scoped thread the same
//! value explicitly instead, since there is no ambient task-local here.

use uuid::Uuid;

/// The boundary header name, inbound optional and outbound mirrored.
pub const CORRELATION_ID_HEADER: &str = "Correlation-Id";

/// A validated correlation identifier: opaque, at least 16 hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Adopt a caller-supplied identifier if it looks plausible, otherwise
    /// generate a fresh one.
    ///
    /// "Plausible" means non-empty after trimming; the spec does not require
    /// strict hex validation of caller-supplied values, only that generated
    /// ones are 16+ hex characters.
    pub fn adopt_or_generate(supplied: Option<&str>) -> Self {
        match supplied.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => Self(value.to_owned()),
            None => Self::generate(),
        }
    }

    /// Generate a fresh, opaque identifier (32 hex characters).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CorrelationId> for String {
    fn from(value: CorrelationId) -> Self {
        value.0
    }
}
