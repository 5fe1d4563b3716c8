//! Pageview Analytics Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository trait
//! - `application/` - Record use case
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handler, DTOs, router
//!
//! Request metadata (user agent, client address) is taken from the HTTP
//! request, never from the payload.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::AnalyticsConfig;
pub use error::{AnalyticsError, AnalyticsResult};
pub use infra::postgres::PgPageviewRepository;
pub use presentation::router::{analytics_router, analytics_router_generic};
