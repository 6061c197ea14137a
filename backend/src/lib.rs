//! Events API library modules.
//!
//! The crate follows a hexagonal layout: `domain` owns entities, rules and
//! ports; `inbound::http` adapts Actix requests onto the driving ports; and
//! `outbound` implements the driven ports over PostgreSQL or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
