//! The domain layer: ports, resilience kernel, and the two core services
//! (resolver, mutator) that implement `spec.md`'s boundary operations.
//!
//! This layer has no knowledge of HTTP, Postgres, Redis, or Kafka; it depends
//! only on the port traits in [`ports`] and the [`mockable::Clock`]
//! abstraction, so it can be exercised entirely with in-memory mocks.

pub mod audit;
pub mod audit_query;
pub mod correlation;
mod error;
pub mod mutator;
pub mod ports;
pub mod resilience;
pub mod resolver;
pub mod route_event;
pub mod route_identifier;

pub use audit_query::AuditQuery;
pub use correlation::{CorrelationId, CORRELATION_ID_HEADER};
pub use error::{Error, ErrorCode};
pub use mutator::{CreateResult, Mutator, ToggleResult};
pub use resolver::{Resolver, ResolverConfig};
pub use route_event::{EndpointState, RouteAction, RouteEvent};
pub use route_identifier::{validate_url, RouteIdentifier};
