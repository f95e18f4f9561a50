use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::SearchqlError;
use crate::Result;

/// Maximum number of documents a compiled query asks for
pub const DEFAULT_LIMIT: usize = 10;

/// Default cap on raw query length, applied before sanitization
pub const DEFAULT_MAX_QUERY_LENGTH: usize = 4096;

/// Type hint for how a field is indexed
///
/// Fields without a hint are treated as free text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexingStrategy {
    Numeric,
    Date,
}

/// Field configuration consulted while rewriting a query
///
/// Owned by the caller and only read during compilation, so one value can be
/// shared between concurrent compiles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Fields eligible for matching, in order
    pub query_keys: Vec<String>,
    #[serde(default)]
    pub indexing_strategies: HashMap<String, IndexingStrategy>,
    /// Per-field boost multipliers, overriding any `^boost` in the query
    #[serde(default)]
    pub boosts: HashMap<String, f64>,
}

impl FieldConfig {
    /// Create a configuration from an ordered list of query keys
    ///
    /// Duplicate keys keep their first position.
    pub fn new<I, S>(query_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut keys: Vec<String> = Vec::new();
        for key in query_keys {
            let key = key.into();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        Self {
            query_keys: keys,
            indexing_strategies: HashMap::new(),
            boosts: HashMap::new(),
        }
    }

    /// Set the indexing strategy for a field
    pub fn with_strategy(mut self, field: impl Into<String>, strategy: IndexingStrategy) -> Self {
        self.indexing_strategies.insert(field.into(), strategy);
        self
    }

    /// Set the default boost for a field
    pub fn with_boost(mut self, field: impl Into<String>, boost: f64) -> Self {
        self.boosts.insert(field.into(), boost);
        self
    }

    /// Parse a configuration from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn is_query_key(&self, field: &str) -> bool {
        self.query_keys.iter().any(|key| key == field)
    }

    pub fn strategy(&self, field: &str) -> Option<IndexingStrategy> {
        self.indexing_strategies.get(field).copied()
    }

    pub fn boost(&self, field: &str) -> Option<f64> {
        self.boosts.get(field).copied()
    }

    fn validated(self) -> Result<Self> {
        if let Some((field, boost)) = self.boosts.iter().find(|(_, b)| **b < 0.0) {
            return Err(SearchqlError::InvalidConfig(format!(
                "Boost for field '{}' must not be negative, got {}",
                field, boost
            )));
        }

        let mut deduped = FieldConfig::new(self.query_keys);
        deduped.indexing_strategies = self.indexing_strategies;
        deduped.boosts = self.boosts;
        Ok(deduped)
    }
}

/// Compiler-wide settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Longest raw query accepted, in characters
    pub max_query_length: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_query_length: DEFAULT_MAX_QUERY_LENGTH,
        }
    }
}

impl CompilerConfig {
    /// Set the maximum accepted query length
    pub fn with_max_query_length(mut self, max: usize) -> Self {
        self.max_query_length = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_configs() {
        let compiler = CompilerConfig::default();
        assert_eq!(compiler.max_query_length, DEFAULT_MAX_QUERY_LENGTH);

        let fields = FieldConfig::default();
        assert!(fields.query_keys.is_empty());
        assert!(fields.boosts.is_empty());
    }

    #[test]
    fn test_field_config_builder() {
        let config = FieldConfig::new(["title", "age", "title"])
            .with_strategy("age", IndexingStrategy::Numeric)
            .with_boost("title", 2.5);

        assert_eq!(config.query_keys, vec!["title", "age"]);
        assert!(config.is_query_key("age"));
        assert!(!config.is_query_key("body"));
        assert_eq!(config.strategy("age"), Some(IndexingStrategy::Numeric));
        assert_eq!(config.strategy("title"), None);
        assert_eq!(config.boost("title"), Some(2.5));
    }

    #[test]
    fn test_from_json_str() {
        let config = FieldConfig::from_json_str(
            r#"{
                "query_keys": ["title", "published", "title"],
                "indexing_strategies": {"published": "DATE"},
                "boosts": {"title": 3}
            }"#,
        )
        .unwrap();

        assert_eq!(config.query_keys, vec!["title", "published"]);
        assert_eq!(config.strategy("published"), Some(IndexingStrategy::Date));
        assert_eq!(config.boost("title"), Some(3.0));
    }

    #[test]
    fn test_from_json_str_optional_maps() {
        let config = FieldConfig::from_json_str(r#"{"query_keys": ["title"]}"#).unwrap();
        assert!(config.indexing_strategies.is_empty());
        assert!(config.boosts.is_empty());
    }

    #[test]
    fn test_from_json_str_rejects_unknown_strategy() {
        let result = FieldConfig::from_json_str(
            r#"{"query_keys": ["a"], "indexing_strategies": {"a": "GEO"}}"#,
        );
        assert!(matches!(result, Err(SearchqlError::Serialization(_))));
    }

    #[test]
    fn test_from_json_str_rejects_negative_boost() {
        let result = FieldConfig::from_json_str(r#"{"query_keys": ["a"], "boosts": {"a": -1.5}}"#);
        assert!(matches!(result, Err(SearchqlError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"query_keys": ["title", "age"], "indexing_strategies": {{"age": "NUMERIC"}}}}"#)
            .unwrap();

        let config = FieldConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.query_keys, vec!["title", "age"]);
        assert_eq!(config.strategy("age"), Some(IndexingStrategy::Numeric));
    }

    #[test]
    fn test_from_json_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = FieldConfig::from_json_file(dir.path().join("missing.json"));
        assert!(matches!(result, Err(SearchqlError::Io(_))));
    }
}
