//! The logical route identifier shared by every external interface and the
//! cache: the 4-tuple `(tenant, service, env, version)`.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::{Error, ErrorCode};

/// A validated `(tenant, service, env, version)` tuple.
///
/// Construction validates that every component is non-empty and contains no
/// `:` (the canonical string form joins components with `:`, and an embedded
/// separator would make that form ambiguous to parse back).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct RouteIdentifier {
    tenant: String,
    service: String,
    env: String,
    version: String,
}

impl RouteIdentifier {
    /// Validate and construct a route identifier.
    ///
    /// # Errors
    /// Returns [`ErrorCode::Validation`] if any component is empty (after
    /// trimming) or contains the `:` separator.
    pub fn new(
        tenant: impl Into<String>,
        service: impl Into<String>,
        env: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, Error> {
        let tenant = tenant.into();
        let service = service.into();
        let env = env.into();
        let version = version.into();

        for (name, value) in [
            ("tenant", &tenant),
            ("service", &service),
            ("env", &env),
            ("version", &version),
        ] {
            if value.trim().is_empty() {
                return Err(Error::new(
                    ErrorCode::Validation,
                    format!("route identifier component '{name}' must not be empty"),
                ));
            }
            if value.contains(':') {
                return Err(Error::new(
                    ErrorCode::Validation,
                    format!("route identifier component '{name}' must not contain ':'"),
                ));
            }
        }

        Ok(Self {
            tenant,
            service,
            env,
            version,
        })
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The canonical `tenant:service:env:version` string form, used as the
    /// event partition key and the cache key suffix.
    pub fn canonical(&self) -> String {
        format!("{}:{}:{}:{}", self.tenant, self.service, self.env, self.version)
    }

    /// The Redis key under which this route's cache entry lives.
    pub fn cache_key(&self) -> String {
        format!("route:{}", self.canonical())
    }
}

impl fmt::Display for RouteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

/// Validate a non-empty, absolute-looking endpoint URL.
///
/// The core treats the URL as opaque beyond requiring it be non-empty and
/// parseable, per the data model's "the core does not parse it" invariant —
/// parsing here only rejects garbage, it never inspects the result.
pub fn validate_url(url: &str) -> Result<(), Error> {
    if url.trim().is_empty() {
        return Err(Error::validation("url must not be empty"));
    }
    url::Url::parse(url)
        .map_err(|err| Error::validation(format!("url is not a valid absolute URL: {err}")))?;
    Ok(())
}
