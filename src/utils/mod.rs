//! Utility functions

pub mod crypto;
pub mod validation;

pub use crypto::hash_string;
pub use validation::{USERNAME_REGEX, normalize_email};
