//! Simplifier pass: flattens a parse tree into an ordered term list
//!
//! The term list is a linear record of user intent that the normalizer can
//! reason about without tree context. Folding a node also yields that node's
//! own canonical term, which parent productions compose:
//!
//! - words, field assignments, phrases, ranges and comparisons append
//!   themselves and return themselves
//! - `OR` appends the pair `left OR right` but returns only `left`, so the
//!   right operand is never visible to enclosing productions
//! - negation removes every earlier term with the same text as its operand,
//!   appends `NOT operand` and returns the bare operand
//! - a component returns its first part
//!
//! The sort clause is not a term; it is reported separately.

use std::fmt;

use crate::query::ast::{FieldValue, Operator, Query, Quote, SortComponent, Start};

/// One unit of the simplifier's flat representation
///
/// `Display` renders the canonical surface text, re-quoting literals with the
/// quote character they were typed with.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    /// Free word, `word` or `word^boost`
    Plain(String),
    /// `field:value`
    FieldAssign { field: String, value: FieldValue },
    /// Quoted literal with no field
    Phrase { text: String, quote: Quote },
    /// `field[lo,hi]`
    Range { field: String, lo: String, hi: String },
    /// `field OP value`
    Comparison {
        field: String,
        operator: Operator,
        value: String,
    },
    /// `left OR right`
    Or(Box<Term>, Box<Term>),
    /// `-inner`
    Not(Box<Term>),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Plain(text) => f.write_str(text),
            Term::FieldAssign { field, value } => write!(f, "{}:{}", field, value),
            Term::Phrase { text, quote } => write!(f, "{}{}{}", quote, text, quote),
            Term::Range { field, lo, hi } => write!(f, "{}[{},{}]", field, lo, hi),
            Term::Comparison {
                field,
                operator,
                value,
            } => write!(f, "{}{}{}", field, operator, value),
            Term::Or(left, right) => write!(f, "{} OR {}", left, right),
            Term::Not(inner) => write!(f, "-{}", inner),
        }
    }
}

/// Output of the simplifier pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Simplified {
    pub terms: Vec<Term>,
    pub sort: Option<SortComponent>,
}

/// Folds a parse tree into a [`Simplified`] term list
#[derive(Debug, Default)]
pub struct Simplifier {
    terms: Vec<Term>,
}

impl Simplifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the pass over a parse tree
    pub fn simplify(tree: &Start) -> Simplified {
        let mut simplifier = Self::new();
        if let Some(query) = &tree.query {
            simplifier.fold(query);
        }

        Simplified {
            terms: simplifier.terms,
            sort: tree.sort.clone(),
        }
    }

    /// Fold one node, returning its canonical term
    fn fold(&mut self, query: &Query) -> Term {
        match query {
            Query::QueryComponent(parts) => {
                let mut first = None;
                for part in parts {
                    let term = self.fold(part);
                    if first.is_none() {
                        first = Some(term);
                    }
                }
                // The parser never yields an empty component
                first.unwrap_or_else(|| Term::Plain(String::new()))
            }
            Query::OrQuery(left, right) => {
                let left = self.fold(left);
                let right = self.fold(right);
                self.terms
                    .push(Term::Or(Box::new(left.clone()), Box::new(right)));
                left
            }
            Query::NegateQuery(inner) => {
                let inner = self.fold(inner);
                let text = inner.to_string();
                self.terms.retain(|term| term.to_string() != text);
                self.terms.push(Term::Not(Box::new(inner.clone())));
                inner
            }
            Query::WordQuery { word, boost } => {
                let text = match boost {
                    Some(boost) => format!("{}^{}", word, boost),
                    None => word.clone(),
                };
                self.append(Term::Plain(text))
            }
            Query::FieldQuery { field, value } => self.append(Term::FieldAssign {
                field: field.clone(),
                value: value.clone(),
            }),
            Query::StrictSearchQuery { phrase, quote } => self.append(Term::Phrase {
                text: phrase.clone(),
                quote: *quote,
            }),
            Query::RangeQuery { field, lo, hi } => self.append(Term::Range {
                field: field.clone(),
                lo: lo.clone(),
                hi: hi.clone(),
            }),
            Query::Comparison {
                field,
                operator,
                value,
            } => self.append(Term::Comparison {
                field: field.clone(),
                operator: *operator,
                value: value.clone(),
            }),
        }
    }

    fn append(&mut self, term: Term) -> Term {
        self.terms.push(term.clone());
        term
    }
}
