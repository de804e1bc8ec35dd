//! Shared HTTP adapter state: handlers depend only on the domain services,
//! never on concrete adapters, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::{AuditQuery, Mutator, Resolver};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub resolver: Arc<Resolver>,
    pub mutator: Arc<Mutator>,
    pub audit_query: Arc<AuditQuery>,
}

impl HttpState {
    pub fn new(resolver: Arc<Resolver>, mutator: Arc<Mutator>, audit_query: Arc<AuditQuery>) -> Self {
        Self {
            resolver,
            mutator,
            audit_query,
        }
    }
}
