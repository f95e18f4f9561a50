use serde_json::{json, Value};

use searchql::{compile, FieldConfig, IndexingStrategy};

fn catalog_fields() -> FieldConfig {
    FieldConfig::new(["title", "body", "year", "published"])
        .with_strategy("year", IndexingStrategy::Numeric)
        .with_strategy("published", IndexingStrategy::Date)
        .with_boost("title", 2.0)
}

fn word_leaves(value: Value, body_boost: f64) -> Value {
    json!({"or": [
        {"title": {"contains": value.clone(), "boost": 2.0}},
        {"body": {"contains": value.clone(), "boost": body_boost}},
        {"published": {"contains": value, "boost": body_boost}}
    ]})
}

fn golden(query: &str) -> Value {
    compile(query, &catalog_fields()).unwrap().to_json().unwrap()
}

#[test]
fn test_golden_implicit_and() {
    assert_eq!(
        golden("rust tutorial"),
        json!({
            "query": {"and": [word_leaves(json!("rust"), 1.0), word_leaves(json!("tutorial"), 1.0)]},
            "limit": 10
        })
    );
}

#[test]
fn test_golden_phrase_comparison_negation_sort() {
    assert_eq!(
        golden("'borrow checker' year>=2020 -title:draft sort:published desc"),
        json!({
            "query": {"and": [
                {"or": [
                    {"title": {"contains": "borrow checker", "strict": true}},
                    {"body": {"contains": "borrow checker", "strict": true}}
                ]},
                {"year": {"greater_than_or_equal": 2020}},
                {"not": {"title": {"contains": "draft"}}}
            ]},
            "limit": 10,
            "sort_by": "published",
            "sort_order": "desc"
        })
    );
}

#[test]
fn test_golden_or_with_range() {
    assert_eq!(
        golden("rust OR go year[2010,2020]"),
        json!({
            "query": {"and": [
                {"or": [word_leaves(json!("rust"), 1.0), word_leaves(json!("go"), 1.0)]},
                {"year": {"range": ["2010", "2020"]}}
            ]},
            "limit": 10
        })
    );
}

#[test]
fn test_golden_boost_and_sanitized_quotes() {
    // Double quotes are stripped before parsing, so the literal splits apart
    assert_eq!(
        golden("Rust^3 title:\"Big Cat\""),
        json!({
            "query": {"and": [
                word_leaves(json!("Rust"), 3.0),
                {"title": {"contains": "Big"}},
                word_leaves(json!("Cat"), 1.0)
            ]},
            "limit": 10
        })
    );
}

#[test]
fn test_golden_numeric_coercion() {
    assert_eq!(
        golden("42 title:007"),
        json!({
            "query": {"and": [
                word_leaves(json!(42), 1.0),
                {"title": {"contains": 7}}
            ]},
            "limit": 10
        })
    );
}

#[test]
fn test_golden_sort_only() {
    assert_eq!(
        golden("sort:year"),
        json!({"query": {}, "limit": 10, "sort_by": "year", "sort_order": "asc"})
    );
}

#[test]
fn test_golden_repeated_and_cancelled_terms() {
    assert_eq!(golden("rust rust go -go"), golden("rust -go"));
    assert_eq!(
        golden("rust -go"),
        json!({
            "query": {"and": [
                word_leaves(json!("rust"), 1.0),
                {"not": word_leaves(json!("go"), 1.0)}
            ]},
            "limit": 10
        })
    );
}
