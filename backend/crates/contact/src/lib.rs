//! Contact Form Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and notifier traits
//! - `application/` - Submit use case
//! - `infra/` - PostgreSQL repository, Slack notifier
//! - `presentation/` - HTTP handler, DTOs, router
//!
//! ## Abuse handling
//! - Every well-formed submission is counted by the shared rate limiter
//!   before it is stored
//! - A filled `website` field (honeypot) is acknowledged but never stored

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::ContactConfig;
pub use error::{ContactError, ContactResult};
pub use infra::postgres::PgContactRepository;
pub use infra::slack::SlackContactNotifier;
pub use presentation::router::{contact_router, contact_router_generic};

#[cfg(test)]
mod tests;
