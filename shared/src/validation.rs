//! Input validation functions
//!
//! Each validator returns `Result<_, String>` with a human readable
//! message; [`ValidationReport`] collects them into per-field errors.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// Maximum length for short text fields (names, addresses, ...)
pub const MAX_FIELD_LEN: usize = 255;

/// Maximum length of a text note
pub const MAX_CONTENT_LEN: usize = 10_000;

/// Prices are stored with two decimal places and at most ten integer digits
pub const PRICE_SCALE: u32 = 2;
pub const MAX_PRICE_INTEGER_DIGITS: u32 = 10;

/// A single failed field check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

/// Accumulates field errors in the order the checks run
#[derive(Debug, Default)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Record the outcome of a check for `field`
    pub fn check(&mut self, field: &str, result: Result<(), String>) -> &mut Self {
        if let Err(msg) = result {
            self.errors.push(FieldError {
                field: field.to_string(),
                msg,
            });
        }
        self
    }

    /// Record a parsing check, keeping the parsed value on success
    pub fn parse<T>(&mut self, field: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(msg) => {
                self.check(field, Err(msg));
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Canonical form of an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    static EMAIL_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();

    if email.is_empty() {
        return Err("a valid email is required".to_string());
    }
    if email.len() > MAX_FIELD_LEN {
        return Err("email too long".to_string());
    }
    let email_regex = EMAIL_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    });
    if !email_regex.is_match(email) {
        return Err("a valid email is required".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    let chars = password.chars().count();
    if chars < 8 {
        return Err("password must be at least 8 characters".to_string());
    }
    if chars > 128 {
        return Err("password too long".to_string());
    }
    Ok(())
}

/// Validate a display name
pub fn validate_name(name: &str) -> Result<(), String> {
    validate_required(name, "name is required")
}

/// Non-blank, bounded text field
pub fn validate_required(value: &str, msg: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(msg.to_string());
    }
    if trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(format!("must be at most {} characters", MAX_FIELD_LEN));
    }
    Ok(())
}

/// Parse a non-negative price such as `"120.50"`
pub fn validate_price(raw: &str) -> Result<Decimal, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("price is required".to_string());
    }
    let price = Decimal::from_str(trimmed).map_err(|_| "price must be a number".to_string())?;
    if price.is_sign_negative() {
        return Err("price cannot be negative".to_string());
    }
    let price = price.normalize();
    if price.scale() > PRICE_SCALE {
        return Err(format!(
            "price can have at most {} decimal places",
            PRICE_SCALE
        ));
    }
    if price.trunc() >= Decimal::from(10_i64.pow(MAX_PRICE_INTEGER_DIGITS)) {
        return Err("price is too large".to_string());
    }
    Ok(price)
}

/// Validate text note content
pub fn validate_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("content is required".to_string());
    }
    if content.chars().count() > MAX_CONTENT_LEN {
        return Err(format!(
            "content must be at most {} characters",
            MAX_CONTENT_LEN
        ));
    }
    Ok(())
}
