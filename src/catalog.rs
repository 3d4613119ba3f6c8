//! Problem catalog
//!
//! The catalog is a fixed list of problems shipped with the binary (or read
//! from `CATALOG_PATH`). It is validated on load and written to the database
//! once, when the problems table is still empty.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    config::CatalogConfig,
    db::repositories::ProblemRepository,
    models::Difficulty,
};

const EMBEDDED_CATALOG: &str = include_str!("../data/neetcode150.json");

/// One catalog entry as stored in the catalog file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub slug: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub topics: Vec<String>,
    pub leetcode_url: String,
    #[serde(default)]
    pub neetcode_url: Option<String>,
    pub order_index: i32,
}

/// Catalog loading and seeding errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains no problems")]
    Empty,

    #[error("Catalog entry {0} has an empty title or slug")]
    MissingField(i32),

    #[error("Duplicate slug in catalog: {0}")]
    DuplicateSlug(String),

    #[error("Duplicate order index in catalog: {0}")]
    DuplicateOrderIndex(i32),

    #[error("Failed to seed catalog: {0}")]
    Seed(String),
}

/// Load the catalog from the configured file or the embedded copy
pub fn load(config: &CatalogConfig) -> Result<Vec<CatalogEntry>, CatalogError> {
    match &config.path {
        Some(path) => load_file(path),
        None => parse(EMBEDDED_CATALOG),
    }
}

pub fn load_file(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&raw)
}

/// Parse and validate catalog JSON
pub fn parse(raw: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
    validate(&entries)?;
    Ok(entries)
}

fn validate(entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    if entries.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut slugs = HashSet::with_capacity(entries.len());
    let mut indices = HashSet::with_capacity(entries.len());

    for entry in entries {
        if entry.title.trim().is_empty() || entry.slug.trim().is_empty() {
            return Err(CatalogError::MissingField(entry.order_index));
        }
        if !slugs.insert(entry.slug.as_str()) {
            return Err(CatalogError::DuplicateSlug(entry.slug.clone()));
        }
        if !indices.insert(entry.order_index) {
            return Err(CatalogError::DuplicateOrderIndex(entry.order_index));
        }
    }

    Ok(())
}

/// Insert the catalog unless problems already exist.
///
/// Returns the number of problems inserted.
pub async fn seed_if_empty(pool: &PgPool, entries: &[CatalogEntry]) -> Result<usize, CatalogError> {
    let existing = ProblemRepository::count(pool)
        .await
        .map_err(|e| CatalogError::Seed(e.to_string()))?;

    if existing > 0 {
        tracing::info!(existing, "Problem catalog already seeded, skipping");
        return Ok(0);
    }

    let inserted = ProblemRepository::insert_catalog(pool, entries)
        .await
        .map_err(|e| CatalogError::Seed(e.to_string()))?;

    tracing::info!(inserted, "Seeded problem catalog");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_embedded_catalog_is_valid() {
        let entries = load(&CatalogConfig::default()).unwrap();
        assert_eq!(entries.len(), 150);

        for tier in Difficulty::ALL {
            assert!(entries.iter().any(|e| e.difficulty == tier));
        }

        let mut order: Vec<i32> = entries.iter().map(|e| e.order_index).collect();
        order.sort_unstable();
        assert_eq!(order, (1..=150).collect::<Vec<_>>());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"title": "Two Sum", "slug": "two-sum", "difficulty": "Easy",
                  "topics": ["Arrays & Hashing"],
                  "leetcode_url": "https://leetcode.com/problems/two-sum/", "order_index": 1}},
                {{"title": "LRU Cache", "slug": "lru-cache", "difficulty": "Medium",
                  "leetcode_url": "https://leetcode.com/problems/lru-cache/", "order_index": 2}}
            ]"#
        )
        .unwrap();

        let config = CatalogConfig {
            path: Some(file.path().to_path_buf()),
        };
        let entries = load(&config).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].difficulty, Difficulty::Medium);
        assert!(entries[1].topics.is_empty());
        assert!(entries[1].neetcode_url.is_none());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        assert!(matches!(parse("[]").unwrap_err(), CatalogError::Empty));
    }

    #[test]
    fn test_rejects_duplicates() {
        let dup_slug = r#"[
            {"title": "A", "slug": "a", "difficulty": "Easy", "leetcode_url": "u", "order_index": 1},
            {"title": "B", "slug": "a", "difficulty": "Hard", "leetcode_url": "u", "order_index": 2}
        ]"#;
        assert!(matches!(parse(dup_slug).unwrap_err(), CatalogError::DuplicateSlug(s) if s == "a"));

        let dup_index = r#"[
            {"title": "A", "slug": "a", "difficulty": "Easy", "leetcode_url": "u", "order_index": 1},
            {"title": "B", "slug": "b", "difficulty": "Hard", "leetcode_url": "u", "order_index": 1}
        ]"#;
        assert!(matches!(
            parse(dup_index).unwrap_err(),
            CatalogError::DuplicateOrderIndex(1)
        ));
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        let raw = r#"[{"title": "A", "slug": "a", "difficulty": "Insane", "leetcode_url": "u", "order_index": 1}]"#;
        assert!(matches!(parse(raw).unwrap_err(), CatalogError::Parse(_)));
    }

    #[test]
    fn test_rejects_blank_title() {
        let raw = r#"[{"title": " ", "slug": "a", "difficulty": "Easy", "leetcode_url": "u", "order_index": 7}]"#;
        assert!(matches!(parse(raw).unwrap_err(), CatalogError::MissingField(7)));
    }
}
