//! Query string compiler
//!
//! Turns a forgiving, search-engine style query string into a
//! [`StructuredQuery`] predicate tree:
//!
//! - [`query_string`] parses text into an [`ast::Start`] tree
//! - [`simplifier`] flattens a tree into an ordered term list
//! - [`normalizer`] reduces the term list to canonical text
//! - [`rewriter`] resolves a canonical tree against a [`FieldConfig`](crate::FieldConfig)
//! - [`compiler`] chains the passes

pub mod ast;
pub mod compiler;
pub mod normalizer;
pub mod query_string;
pub mod rewriter;
pub mod simplifier;
pub mod types;

pub use ast::{Query, SortComponent, Start};
pub use compiler::{compile, sanitize, QueryCompiler};
pub use normalizer::{canonical_string, StandardNormalizer, TermNormalizer};
pub use rewriter::Rewriter;
pub use simplifier::{Simplified, Simplifier, Term};
pub use types::*;
