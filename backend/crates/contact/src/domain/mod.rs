//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{ContactSubmission, NewContactSubmission};
pub use repository::{ContactNotifier, ContactRepository};
