//! Repository and Notifier Traits
//!
//! Interfaces for persistence and outbound notification. Implementations
//! live in the infrastructure layer.

use crate::domain::entities::{ContactSubmission, NewContactSubmission};
use crate::error::ContactResult;

#[trait_variant::make(ContactRepository: Send)]
pub trait LocalContactRepository {
    /// Insert a submission, returning the stored row
    async fn create(&self, submission: &NewContactSubmission) -> ContactResult<ContactSubmission>;
}

#[trait_variant::make(ContactNotifier: Send)]
pub trait LocalContactNotifier {
    /// Tell a human about a stored submission
    async fn notify(&self, submission: &ContactSubmission) -> ContactResult<()>;
}
