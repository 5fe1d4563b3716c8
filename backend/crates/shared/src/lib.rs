//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! feature crates:
//! - The unified [`error::app_error::AppError`] type and its result alias
//! - [`error::kind::ErrorKind`], the HTTP-facing error classification
//! - Conversions from infrastructure errors (feature-gated)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
