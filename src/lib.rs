pub mod config;
pub mod error;
pub mod query;

pub use config::{CompilerConfig, FieldConfig, IndexingStrategy, DEFAULT_LIMIT};
pub use error::{Result, SearchqlError};
pub use query::{compile, QueryCompiler, StructuredQuery};
