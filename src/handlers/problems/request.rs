//! Problem request DTOs

use serde::Deserialize;

/// Optional filters for the problem listing
#[derive(Debug, Default, Deserialize)]
pub struct ListProblemsQuery {
    /// Easy, Medium or Hard (case-insensitive)
    pub difficulty: Option<String>,
    pub topic: Option<String>,
}
