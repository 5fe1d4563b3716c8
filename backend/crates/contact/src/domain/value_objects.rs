//! Domain Value Objects
//!
//! Validated, trimmed form fields. Lengths are counted in characters and
//! match the column widths of `contact_submissions`.

use crate::error::{ContactError, ContactResult};
use std::fmt;

pub const NAME_MAX_LENGTH: usize = 120;
pub const EMAIL_MAX_LENGTH: usize = 320;
pub const MESSAGE_MAX_LENGTH: usize = 5000;
pub const WEBSITE_MAX_LENGTH: usize = 255;

/// Local part limit from RFC 5321
const EMAIL_LOCAL_MAX_LENGTH: usize = 64;

fn required(field: &'static str, value: &str, max: usize) -> ContactResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ContactError::validation(field, "must not be empty"));
    }
    if value.chars().count() > max {
        return Err(ContactError::validation(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(value.to_string())
}

/// Sender's display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactName(String);

impl ContactName {
    pub fn new(value: &str) -> ContactResult<Self> {
        required("name", value, NAME_MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Sender's reply address
///
/// Shape check only. The address is stored as typed (trimmed), since the
/// local part may be case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(value: &str) -> ContactResult<Self> {
        let email = required("email", value, EMAIL_MAX_LENGTH)?;
        if !Self::is_valid_format(&email) {
            return Err(ContactError::validation(
                "email",
                "value is not a valid email address",
            ));
        }
        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty()
            || local.len() > EMAIL_LOCAL_MAX_LENGTH
            || local.chars().any(char::is_whitespace)
        {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') || domain.contains("..") {
            return false;
        }

        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return false;
        }

        !(domain.starts_with(['.', '-']) || domain.ends_with(['.', '-']))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text body of the submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage(String);

impl ContactMessage {
    pub fn new(value: &str) -> ContactResult<Self> {
        required("message", value, MESSAGE_MAX_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hidden form field that humans never fill in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Honeypot(Option<String>);

impl Honeypot {
    /// Trimmed; blank counts as not filled
    pub fn new(value: Option<&str>) -> ContactResult<Self> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        if value.is_some_and(|v| v.chars().count() > WEBSITE_MAX_LENGTH) {
            return Err(ContactError::validation(
                "website",
                format!("must be at most {} characters", WEBSITE_MAX_LENGTH),
            ));
        }
        Ok(Self(value.map(str::to_string)))
    }

    pub fn is_triggered(&self) -> bool {
        self.0.is_some()
    }
}
