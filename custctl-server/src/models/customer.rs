//! Customer field validation
//!
//! Names and emails are trimmed, bounded at 255 characters, free of control
//! characters (PostgreSQL text cannot hold NUL), and checked once at
//! construction. Anything holding a `NewCustomer` is safe to insert.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for both customer fields, matching the VARCHAR(255) columns
pub const MAX_FIELD_LEN: usize = 255;

/// `local@domain`: one `@`, no whitespace, non-empty on both sides
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("invalid email regex"));

fn bounded(field: &'static str, raw: &str) -> Result<String, ValidationError> {
    let value = raw.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }

    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must not contain control characters",
        });
    }

    Ok(value.to_owned())
}

/// Validated customer name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerName(String);

impl CustomerName {
    /// Create a customer name.
    ///
    /// # Rules
    /// - Surrounding whitespace is trimmed
    /// - Must not be empty after trimming
    /// - Max 255 characters
    /// - No control characters
    ///
    /// # Example
    /// ```
    /// use custctl_server::models::CustomerName;
    ///
    /// assert_eq!(CustomerName::new("  John Doe ").unwrap().as_str(), "John Doe");
    /// assert!(CustomerName::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        bounded("name", s).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated customer email (shape check only, no deliverability)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerEmail(String);

impl CustomerEmail {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let value = bounded("email", s)?;

        if !EMAIL_RE.is_match(&value) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like local@domain",
            });
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CustomerEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A customer ready to be appended to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: CustomerName,
    pub email: CustomerEmail,
}

impl NewCustomer {
    /// Validate raw input. Missing fields are reported as empty, name first.
    pub fn parse(name: Option<&str>, email: Option<&str>) -> Result<Self, ValidationError> {
        let name = CustomerName::new(name.unwrap_or_default())?;
        let email = CustomerEmail::new(email.unwrap_or_default())?;
        Ok(Self { name, email })
    }
}

/// A stored customer as returned by list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub name: String,
    pub email: String,
}

impl From<NewCustomer> for Customer {
    fn from(c: NewCustomer) -> Self {
        Self {
            name: c.name.into_string(),
            email: c.email.into_string(),
        }
    }
}
