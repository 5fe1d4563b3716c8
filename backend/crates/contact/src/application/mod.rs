//! Application Layer
//!
//! Use cases and feature configuration.

pub mod config;
pub mod submit_contact;
