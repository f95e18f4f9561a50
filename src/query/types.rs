//! Core types for compiled queries
//!
//! A [`StructuredQuery`] serializes to the wire shape consumed by the
//! execution engine:
//!
//! ```json
//! {
//!   "query": {
//!     "and": [
//!       { "or": [ { "title": { "contains": "rust", "boost": 1.0 } } ] },
//!       { "not": { "status": { "contains": "draft" } } },
//!       { "price": { "range": ["10", "20"] } },
//!       { "age": { "greater_than": 18 } }
//!     ]
//!   },
//!   "limit": 10,
//!   "sort_by": "title",
//!   "sort_order": "desc"
//! }
//! ```

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::DEFAULT_LIMIT;
use crate::query::ast::Operator;
use crate::Result;

/// Default sort order when a sort clause omits one
pub const DEFAULT_SORT_ORDER: &str = "asc";

/// Final compiled query
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StructuredQuery {
    pub query: Predicate,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    /// Order token as typed, `asc` when the sort clause had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
}

impl StructuredQuery {
    /// A query with no constraints
    pub fn match_all() -> Self {
        Self {
            query: Predicate::Empty,
            limit: DEFAULT_LIMIT,
            sort_by: None,
            sort_order: None,
        }
    }

    /// Render the wire shape as JSON
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Match algorithm for a leaf predicate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Substring or token containment
    Contains,
    /// Pattern match, selected when the value contains `*`
    Wildcard,
}

impl Strategy {
    /// Select the strategy for a value
    pub fn for_value(value: &TermValue) -> Self {
        match value {
            TermValue::Text(text) if text.contains('*') => Strategy::Wildcard,
            _ => Strategy::Contains,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Contains => "contains",
            Strategy::Wildcard => "wildcard",
        }
    }
}

/// Comparator for `field OP value` leaves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Comparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::GreaterThan => "greater_than",
            Comparator::LessThan => "less_than",
            Comparator::GreaterThanOrEqual => "greater_than_or_equal",
            Comparator::LessThanOrEqual => "less_than_or_equal",
        }
    }
}

impl From<Operator> for Comparator {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::GreaterThan => Comparator::GreaterThan,
            Operator::LessThan => Comparator::LessThan,
            Operator::GreaterThanOrEqual => Comparator::GreaterThanOrEqual,
            Operator::LessThanOrEqual => Comparator::LessThanOrEqual,
        }
    }
}

/// Value carried by a leaf predicate
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TermValue {
    /// A bare word made only of digits
    Integer(i64),
    Text(String),
}

impl TermValue {
    /// Interpret a bare word token, coercing all-digit words to integers
    ///
    /// Digit strings too large for `i64` stay text.
    pub fn from_word(word: &str) -> Self {
        if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = word.parse::<i64>() {
                return TermValue::Integer(n);
            }
        }
        TermValue::Text(word.to_string())
    }
}

/// Recursive predicate tree
///
/// `Empty` is the always-true predicate produced for clauses that reference
/// fields outside the configured query keys. The constructors fold it away:
/// it is dropped from `and`/`or` children and absorbs `not`. An empty `Or`
/// built by [`Predicate::any_of`] is the opposite: it matches nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    Empty,
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
    Field { field: String, condition: Condition },
}

impl Predicate {
    /// Conjunction of the non-empty children, in order
    pub fn and(children: Vec<Predicate>) -> Self {
        let children = Self::non_empty(children);
        if children.is_empty() {
            Predicate::Empty
        } else {
            Predicate::And(children)
        }
    }

    /// Disjunction of the non-empty children, in order
    pub fn or(children: Vec<Predicate>) -> Self {
        let children = Self::non_empty(children);
        if children.is_empty() {
            Predicate::Empty
        } else {
            Predicate::Or(children)
        }
    }

    /// Disjunction over field expansions, kept even with no children
    ///
    /// An expansion with no eligible field stays `{"or": []}` and matches
    /// nothing.
    pub fn any_of(leaves: Vec<Predicate>) -> Self {
        Predicate::Or(Self::non_empty(leaves))
    }

    pub fn not(inner: Predicate) -> Self {
        if inner.is_empty() {
            Predicate::Empty
        } else {
            Predicate::Not(Box::new(inner))
        }
    }

    pub fn field(field: impl Into<String>, condition: Condition) -> Self {
        Predicate::Field {
            field: field.into(),
            condition,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Predicate::Empty)
    }

    fn non_empty(children: Vec<Predicate>) -> Vec<Predicate> {
        children.into_iter().filter(|c| !c.is_empty()).collect()
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Predicate::Empty => serializer.serialize_map(Some(0))?.end(),
            Predicate::And(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("and", children)?;
                map.end()
            }
            Predicate::Or(children) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("or", children)?;
                map.end()
            }
            Predicate::Not(inner) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("not", inner)?;
                map.end()
            }
            Predicate::Field { field, condition } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field, condition)?;
                map.end()
            }
        }
    }
}

/// Leaf condition applied to one field
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Match {
        strategy: Strategy,
        value: TermValue,
        boost: Option<f64>,
        /// Exact phrase equality instead of containment
        strict: bool,
    },
    Range {
        lo: String,
        hi: String,
    },
    Compare {
        comparator: Comparator,
        value: TermValue,
    },
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Condition::Match {
                strategy,
                value,
                boost,
                strict,
            } => {
                let len = 1 + usize::from(boost.is_some()) + usize::from(*strict);
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry(strategy.as_str(), value)?;
                if let Some(boost) = boost {
                    map.serialize_entry("boost", boost)?;
                }
                if *strict {
                    map.serialize_entry("strict", &true)?;
                }
                map.end()
            }
            Condition::Range { lo, hi } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("range", &[lo, hi])?;
                map.end()
            }
            Condition::Compare { comparator, value } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(comparator.as_str(), value)?;
                map.end()
            }
        }
    }
}
