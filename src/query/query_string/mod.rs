//! Query string grammar
//!
//! Supports syntax like:
//! - `rust tutorial` (implicit AND)
//! - `rust^2.0` (boosted word)
//! - `title:rust`, `title:'exact words'`, `title:"exact words"`
//! - `'exact words'` (strict phrase across all text fields)
//! - `price[10,20]`
//! - `age>18`, `age<18`, `age>=18`, `age<=18`
//! - `-draft` (negation of any single clause)
//! - `rust OR python`
//! - `sort:title`, `sort:title desc` (trailing only)
//!
//! # Example
//!
//! ```rust
//! use searchql::query::query_string::QueryStringParser;
//!
//! let mut parser = QueryStringParser::new("title:rust -draft sort:published desc").unwrap();
//! let tree = parser.parse().unwrap();
//! assert!(tree.sort.is_some());
//! ```

pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token};
pub use parser::{parse, QueryStringParser};
