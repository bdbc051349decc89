//! Recipe-sharing backend: domain core, HTTP and persistence adapters.
//!
//! The domain owns parsing, name normalisation, catalogue resolution, recipe
//! assembly, presence counting and access control. Inbound adapters expose
//! it over HTTP; outbound adapters persist it in PostgreSQL.

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
