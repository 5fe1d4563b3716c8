//! Infrastructure Layer
//!
//! Database implementation and the Slack notifier.

pub mod postgres;
pub mod slack;

pub use postgres::PgContactRepository;
pub use slack::SlackContactNotifier;
