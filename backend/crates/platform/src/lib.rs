//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Client identification from proxy headers
//! - Rate limiting (fixed window, Redis with in-process fallback)
//! - Slack webhook delivery

pub mod client;
pub mod rate_limit;
pub mod slack;
