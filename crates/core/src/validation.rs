//! Input validation helpers shared by every handler.
//!
//! All validators return `Result<(), CoreError>` with a
//! [`CoreError::Validation`] carrying a human-readable message, so the API
//! layer maps them uniformly to 400 responses.

use std::sync::LazyLock;

use regex::Regex;
use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::DbId;

/// Allowed characters in a phone number: digits with common separators,
/// optionally prefixed with `+`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-().]*$").expect("phone regex must compile"));

/// Minimum digits a phone number must contain.
const PHONE_MIN_DIGITS: usize = 6;
/// Maximum digits a phone number may contain (E.164 upper bound).
const PHONE_MAX_DIGITS: usize = 15;

/// Validate that a path/body id is a positive integer.
///
/// Zero and negative ids are rejected before any database call is made.
pub fn validate_id(entity: &'static str, id: DbId) -> Result<(), CoreError> {
    if id <= 0 {
        return Err(CoreError::Validation(format!(
            "{entity} id must be a positive integer"
        )));
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::Validation("Email must not be empty".to_string()));
    }
    if !email.validate_email() {
        return Err(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

/// Validate a phone number: digits and common separators only, with a
/// sane digit count.
pub fn validate_phone_number(phone: &str) -> Result<(), CoreError> {
    if phone.is_empty() {
        return Err(CoreError::Validation(
            "Phone number must not be empty".to_string(),
        ));
    }
    if !PHONE_RE.is_match(phone) {
        return Err(CoreError::Validation(format!(
            "'{phone}' is not a valid phone number"
        )));
    }
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return Err(CoreError::Validation(format!(
            "Phone number must contain between {PHONE_MIN_DIGITS} and {PHONE_MAX_DIGITS} digits"
        )));
    }
    Ok(())
}

/// Validate that a required text field is non-empty after trimming.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Validate a project progress percentage (0-100).
pub fn validate_progress(progress: i32) -> Result<(), CoreError> {
    if !(0..=100).contains(&progress) {
        return Err(CoreError::Validation(
            "Progress must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

/// Validate that a monetary amount or surface is not negative.
pub fn validate_non_negative(field: &'static str, value: f64) -> Result<(), CoreError> {
    if value < 0.0 || !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

/// Validate a calendar month (1-12).
pub fn validate_month(month: i32) -> Result<(), CoreError> {
    if !(1..=12).contains(&month) {
        return Err(CoreError::Validation(
            "Month must be between 1 and 12".to_string(),
        ));
    }
    Ok(())
}

/// Validate a calendar year. The bounds are generous: this guards against
/// obviously malformed input, not business rules.
pub fn validate_year(year: i32) -> Result<(), CoreError> {
    if !(2000..=2100).contains(&year) {
        return Err(CoreError::Validation(
            "Year must be between 2000 and 2100".to_string(),
        ));
    }
    Ok(())
}
