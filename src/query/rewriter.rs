//! Rewriter pass: resolves a canonical parse tree against field configuration

use tracing::trace;

use crate::config::{FieldConfig, IndexingStrategy, DEFAULT_LIMIT};
use crate::query::ast::{FieldValue, Query, Start};
use crate::query::types::{
    Comparator, Condition, Predicate, Strategy, StructuredQuery, TermValue, DEFAULT_SORT_ORDER,
};

/// Boost applied to implicit word matches without `^boost` or a field boost
const DEFAULT_BOOST: f64 = 1.0;

/// Compiles parse trees into [`StructuredQuery`] values for one field configuration
#[derive(Clone, Copy, Debug)]
pub struct Rewriter<'a> {
    fields: &'a FieldConfig,
}

impl<'a> Rewriter<'a> {
    pub fn new(fields: &'a FieldConfig) -> Self {
        Self { fields }
    }

    /// Rewrite the root production
    ///
    /// The sort clause is hoisted to the top level with `asc` as its default
    /// order; the predicate body never carries sort keys.
    pub fn rewrite(&self, tree: &Start) -> StructuredQuery {
        let query = tree
            .query
            .as_ref()
            .map(|query| self.rewrite_query(query))
            .unwrap_or(Predicate::Empty);

        let (sort_by, sort_order) = match &tree.sort {
            Some(sort) => (
                Some(sort.field.clone()),
                Some(
                    sort.order
                        .clone()
                        .unwrap_or_else(|| DEFAULT_SORT_ORDER.to_string()),
                ),
            ),
            None => (None, None),
        };

        StructuredQuery {
            query,
            limit: DEFAULT_LIMIT,
            sort_by,
            sort_order,
        }
    }

    fn rewrite_query(&self, query: &Query) -> Predicate {
        match query {
            Query::QueryComponent(parts) => {
                Predicate::and(parts.iter().map(|part| self.rewrite_query(part)).collect())
            }
            Query::OrQuery(left, right) => {
                Predicate::or(vec![self.rewrite_query(left), self.rewrite_query(right)])
            }
            Query::NegateQuery(inner) => Predicate::not(self.rewrite_query(inner)),
            Query::WordQuery { word, boost } => self.word_query(word, boost.as_deref()),
            Query::FieldQuery { field, value } => self.field_query(field, value),
            Query::StrictSearchQuery { phrase, .. } => self.strict_search_query(phrase),
            Query::RangeQuery { field, lo, hi } => {
                if !self.is_known_field(field, query.production()) {
                    return Predicate::Empty;
                }
                Predicate::field(
                    field.as_str(),
                    Condition::Range {
                        lo: lo.clone(),
                        hi: hi.clone(),
                    },
                )
            }
            Query::Comparison {
                field,
                operator,
                value,
            } => {
                if !self.is_known_field(field, query.production()) {
                    return Predicate::Empty;
                }
                Predicate::field(
                    field.as_str(),
                    Condition::Compare {
                        comparator: Comparator::from(*operator),
                        value: TermValue::from_word(value),
                    },
                )
            }
        }
    }

    /// A bare word matches every non-numeric query key
    fn word_query(&self, word: &str, boost: Option<&str>) -> Predicate {
        let value = TermValue::from_word(word);
        let strategy = Strategy::for_value(&value);
        let query_boost = boost
            .and_then(|b| b.parse::<f64>().ok())
            .unwrap_or(DEFAULT_BOOST);

        let leaves = self
            .fields
            .query_keys
            .iter()
            .filter(|field| self.fields.strategy(field) != Some(IndexingStrategy::Numeric))
            .map(|field| {
                Predicate::field(
                    field.as_str(),
                    Condition::Match {
                        strategy,
                        value: value.clone(),
                        boost: Some(self.fields.boost(field).unwrap_or(query_boost)),
                        strict: false,
                    },
                )
            })
            .collect();

        Predicate::any_of(leaves)
    }

    fn field_query(&self, field: &str, value: &FieldValue) -> Predicate {
        let field = field.trim_start_matches('-');
        if !self.is_known_field(field, "field_query") {
            return Predicate::Empty;
        }

        let value = match value {
            FieldValue::Word(word) => TermValue::from_word(word),
            FieldValue::Literal { text, .. } => TermValue::Text(text.clone()),
        };

        Predicate::field(
            field,
            Condition::Match {
                strategy: Strategy::for_value(&value),
                value,
                boost: None,
                strict: false,
            },
        )
    }

    /// A quoted phrase matches every free-text query key exactly
    fn strict_search_query(&self, phrase: &str) -> Predicate {
        let value = TermValue::Text(phrase.to_string());
        let strategy = Strategy::for_value(&value);

        let leaves = self
            .fields
            .query_keys
            .iter()
            .filter(|field| {
                !matches!(
                    self.fields.strategy(field),
                    Some(IndexingStrategy::Numeric | IndexingStrategy::Date)
                )
            })
            .map(|field| {
                Predicate::field(
                    field.as_str(),
                    Condition::Match {
                        strategy,
                        value: value.clone(),
                        boost: None,
                        strict: true,
                    },
                )
            })
            .collect();

        Predicate::any_of(leaves)
    }

    fn is_known_field(&self, field: &str, production: &str) -> bool {
        let known = self.fields.is_query_key(field);
        if !known {
            trace!(field = field, production = production, "Field is not a query key, clause elided");
        }
        known
    }
}
