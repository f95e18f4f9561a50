//! Parse tree for query strings
//!
//! Every grammar production is one variant of the closed [`Query`] enum, so
//! both tree passes match on it exhaustively. The tree keeps token text as
//! typed; interpretation (numeric coercion, strategy selection, field
//! gating) happens in the rewriter.

use std::fmt;

/// Root production: an optional query followed by an optional sort clause
///
/// The parser never produces a `Start` with both parts missing.
#[derive(Clone, Debug, PartialEq)]
pub struct Start {
    pub query: Option<Query>,
    pub sort: Option<SortComponent>,
}

/// Query productions
#[derive(Clone, Debug, PartialEq)]
pub enum Query {
    /// `left OR right`
    OrQuery(Box<Query>, Box<Query>),
    /// Adjacent clauses, implicitly AND-ed
    QueryComponent(Vec<Query>),
    /// `word` or `word^boost`
    WordQuery { word: String, boost: Option<String> },
    /// `field:value`, `field:'multi word'` or `field:"multi word"`
    FieldQuery { field: String, value: FieldValue },
    /// `'multi word'` with no field
    StrictSearchQuery { phrase: String, quote: Quote },
    /// `field[lo,hi]`
    RangeQuery { field: String, lo: String, hi: String },
    /// `field OP value`
    Comparison {
        field: String,
        operator: Operator,
        value: String,
    },
    /// `-clause`
    NegateQuery(Box<Query>),
}

impl Query {
    /// Production name, for logging and error messages
    pub fn production(&self) -> &'static str {
        match self {
            Query::OrQuery(..) => "or_query",
            Query::QueryComponent(_) => "query_component",
            Query::WordQuery { .. } => "word_query",
            Query::FieldQuery { .. } => "field_query",
            Query::StrictSearchQuery { .. } => "strict_search_query",
            Query::RangeQuery { .. } => "range_query",
            Query::Comparison { .. } => "comparison",
            Query::NegateQuery(_) => "negate_query",
        }
    }
}

/// `sort:field [asc|desc]`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortComponent {
    pub field: String,
    /// Order token exactly as typed
    pub order: Option<String>,
}

impl fmt::Display for SortComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sort:{}", self.field)?;
        if let Some(order) = &self.order {
            write!(f, " {}", order)?;
        }
        Ok(())
    }
}

/// Right-hand side of a field query
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Word(String),
    Literal { text: String, quote: Quote },
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Word(word) => f.write_str(word),
            FieldValue::Literal { text, quote } => write!(f, "{}{}{}", quote, text, quote),
        }
    }
}

/// Quote character around a multi-word literal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Comparison operator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Sort order tokens accepted after `sort:field`
pub fn is_sort_order(word: &str) -> bool {
    word.eq_ignore_ascii_case("asc") || word.eq_ignore_ascii_case("desc")
}

/// Field names and sort keys: alphanumerics and `_`
pub fn is_term_identifier(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_component_display() {
        let sort = SortComponent {
            field: "title".to_string(),
            order: Some("DESC".to_string()),
        };
        assert_eq!(sort.to_string(), "sort:title DESC");

        let sort = SortComponent {
            field: "title".to_string(),
            order: None,
        };
        assert_eq!(sort.to_string(), "sort:title");
    }

    #[test]
    fn test_field_value_display_requotes() {
        let value = FieldValue::Literal {
            text: "big cat".to_string(),
            quote: Quote::Double,
        };
        assert_eq!(value.to_string(), "\"big cat\"");
        assert_eq!(FieldValue::Word("cat".to_string()).to_string(), "cat");
    }

    #[test]
    fn test_identifiers() {
        assert!(is_term_identifier("created_at"));
        assert!(!is_term_identifier("fo*"));
        assert!(!is_term_identifier("-title"));
        assert!(!is_term_identifier(""));
    }

    #[test]
    fn test_sort_orders() {
        assert!(is_sort_order("asc"));
        assert!(is_sort_order("DESC"));
        assert!(is_sort_order("Desc"));
        assert!(!is_sort_order("up"));
    }

    #[test]
    fn test_production_names() {
        let negated = Query::NegateQuery(Box::new(Query::WordQuery {
            word: "a".to_string(),
            boost: None,
        }));
        assert_eq!(negated.production(), "negate_query");
    }
}
