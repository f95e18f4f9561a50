//! Term normalization and canonical re-serialization
//!
//! A normalizer reduces the simplifier's term list to the token stream that
//! gets parsed a second time. The only contract the compiler relies on is
//! that the returned tokens, joined with single spaces, parse again.

use crate::query::ast::SortComponent;
use crate::query::simplifier::Term;

/// Reduces an ordered term list to canonical query tokens
pub trait TermNormalizer: Send + Sync {
    fn normalize(&self, terms: &[Term]) -> Vec<String>;
}

/// Default normalization policy
///
/// Walks the terms in order:
/// - a positive term is kept unless the same text was already kept
/// - an OR pair absorbs the most recent standalone copy of each operand,
///   then is kept as `left OR right`
/// - a negation drops every kept copy of its operand, then is kept as
///   `-operand`
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardNormalizer;

impl TermNormalizer for StandardNormalizer {
    fn normalize(&self, terms: &[Term]) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::with_capacity(terms.len());

        for term in terms {
            match term {
                Term::Or(left, right) => {
                    remove_last(&mut tokens, &left.to_string());
                    remove_last(&mut tokens, &right.to_string());
                    push_unique(&mut tokens, term.to_string());
                }
                Term::Not(inner) => {
                    let inner = inner.to_string();
                    tokens.retain(|token| *token != inner);
                    push_unique(&mut tokens, term.to_string());
                }
                Term::Plain(_)
                | Term::FieldAssign { .. }
                | Term::Phrase { .. }
                | Term::Range { .. }
                | Term::Comparison { .. } => push_unique(&mut tokens, term.to_string()),
            }
        }

        tokens
    }
}

fn push_unique(tokens: &mut Vec<String>, token: String) {
    if !tokens.contains(&token) {
        tokens.push(token);
    }
}

fn remove_last(tokens: &mut Vec<String>, token: &str) {
    if let Some(index) = tokens.iter().rposition(|t| t == token) {
        tokens.remove(index);
    }
}

/// Join normalized tokens and the sort clause into one query string
pub fn canonical_string(tokens: &[String], sort: Option<&SortComponent>) -> String {
    let mut parts: Vec<String> = tokens.to_vec();
    if let Some(sort) = sort {
        parts.push(sort.to_string());
    }
    parts.join(" ").trim().to_string()
}
