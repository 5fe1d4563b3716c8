//! Domain Entities

use crate::domain::value_objects::{ContactMessage, ContactName, EmailAddress};
use crate::error::ContactResult;
use chrono::{DateTime, Utc};

/// A validated submission that has not been stored yet
#[derive(Debug, Clone)]
pub struct NewContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub message: ContactMessage,
}

impl NewContactSubmission {
    pub fn parse(name: &str, email: &str, message: &str) -> ContactResult<Self> {
        Ok(Self {
            name: ContactName::new(name)?,
            email: EmailAddress::new(email)?,
            message: ContactMessage::new(message)?,
        })
    }
}

/// A stored submission
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
