//! Input validation utilities

use std::sync::LazyLock;

use regex::Regex;

/// Letters, digits, underscores, hyphens and dots; must start with a letter or digit
pub static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").unwrap());

/// Canonical form used for storing and looking up emails
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
