#![cfg_attr(
    test,
    expect(clippy::expect_used, reason = "tests require contextual panics")
)]
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! Routing control plane library modules: domain services, outbound
//! adapters, the HTTP inbound adapter, and server bootstrap.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
