//! Query compilation pipeline
//!
//! ```text
//! raw ─ sanitize ─ parse ─ simplify ─ normalize ─ canonical string
//!                                                        │
//!                           StructuredQuery ─ rewrite ─ parse
//! ```
//!
//! The canonical string is parsed a second time. A failure there means the
//! normalizer emitted text outside the grammar, which is reported as
//! [`SearchqlError::NormalizerContract`] rather than a user syntax error.
//!
//! # Example
//!
//! ```rust
//! use searchql::{compile, FieldConfig};
//!
//! let fields = FieldConfig::new(["title", "body"]);
//! let query = compile("rust -draft sort:title desc", &fields).unwrap();
//! assert_eq!(query.sort_by.as_deref(), Some("title"));
//! assert_eq!(query.limit, 10);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, error};

use crate::config::{CompilerConfig, FieldConfig};
use crate::error::SearchqlError;
use crate::query::normalizer::{canonical_string, StandardNormalizer, TermNormalizer};
use crate::query::query_string::parse;
use crate::query::rewriter::Rewriter;
use crate::query::simplifier::Simplifier;
use crate::query::types::StructuredQuery;
use crate::Result;

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_.,!?^*:\-'<>=\[\] ]").unwrap());

/// Strip every character the grammar cannot represent
pub fn sanitize(query: &str) -> String {
    DISALLOWED_CHARS.replace_all(query, "").into_owned()
}

/// Compiles query strings into [`StructuredQuery`] values
///
/// Holds no per-query state; one compiler can serve concurrent callers, each
/// passing its own [`FieldConfig`].
#[derive(Clone, Debug, Default)]
pub struct QueryCompiler<N = StandardNormalizer> {
    config: CompilerConfig,
    normalizer: N,
}

impl QueryCompiler<StandardNormalizer> {
    /// Create a compiler with the standard normalizer and default settings
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: TermNormalizer> QueryCompiler<N> {
    /// Create a compiler with a custom normalizer
    pub fn with_normalizer(config: CompilerConfig, normalizer: N) -> Self {
        Self { config, normalizer }
    }

    /// Replace the compiler settings
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Reduce a raw query to its canonical string
    ///
    /// Syntax error positions refer to the sanitized query.
    pub fn canonicalize(&self, query: &str) -> Result<String> {
        let length = query.chars().count();
        if length > self.config.max_query_length {
            return Err(SearchqlError::QueryTooLong {
                length,
                max: self.config.max_query_length,
            });
        }

        let sanitized = sanitize(query);
        debug!(sanitized = %sanitized, "Sanitized query");
        if sanitized.trim().is_empty() {
            return Ok(String::new());
        }

        let tree = parse(&sanitized).map_err(|err| {
            debug!(error = %err, "Query rejected by grammar");
            err
        })?;

        let simplified = Simplifier::simplify(&tree);
        let tokens = self.normalizer.normalize(&simplified.terms);
        let canonical = canonical_string(&tokens, simplified.sort.as_ref());
        debug!(canonical = %canonical, terms = simplified.terms.len(), "Canonicalized query");

        Ok(canonical)
    }

    /// Compile a raw query against a field configuration
    pub fn compile(&self, query: &str, fields: &FieldConfig) -> Result<StructuredQuery> {
        let canonical = self.canonicalize(query)?;

        if canonical.is_empty() {
            debug!("Empty canonical query, matching everything");
            return Ok(StructuredQuery::match_all());
        }

        let tree = parse(&canonical).map_err(|err| {
            error!(canonical = %canonical, error = %err, "Normalizer produced unparseable query");
            SearchqlError::NormalizerContract {
                canonical: canonical.clone(),
                message: err.to_string(),
            }
        })?;

        Ok(Rewriter::new(fields).rewrite(&tree))
    }
}

/// Compile a query with the default compiler
pub fn compile(query: &str, fields: &FieldConfig) -> Result<StructuredQuery> {
    QueryCompiler::new().compile(query, fields)
}
