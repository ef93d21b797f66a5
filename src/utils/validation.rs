//! Pure credential format checks.
//!
//! These gate every remote call: no network request is issued when a local
//! check fails. Messages are fixed strings surfaced inline by the workflows.

use validator::ValidateEmail;

/// Special characters accepted by the password rule.
const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.validate_email() {
        Ok(())
    } else {
        Err("Invalid email address")
    }
}

/// Valid iff 8-30 characters, at least one ASCII uppercase letter, and at
/// least one character from the special set.
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    let length = password.chars().count();
    let valid = (8..=30).contains(&length)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

    if valid {
        Ok(())
    } else {
        Err("Password must be 8-30 characters long, contain at least one uppercase letter, and one special character.")
    }
}

/// Valid iff exactly 6 ASCII digits.
pub fn validate_verification_code(code: &str) -> Result<(), &'static str> {
    if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err("Verification code must be exactly 6 numeric digits.")
    }
}
