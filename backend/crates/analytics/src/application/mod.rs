//! Application Layer

pub mod config;
pub mod record_pageview;
