//! Domain Layer
//!
//! Contains entities, value objects, and the repository trait.

pub mod entities;
pub mod repository;
pub mod value_objects;

pub use entities::{NewPageview, Pageview, RequestMetadata};
pub use repository::PageviewRepository;
