//! Use-case layer: query construction and search orchestration.

pub mod query;
pub mod search;

pub use query::{FieldCode, SearchQuery};
pub use search::{SearchEngine, SearchError, SearchOptions};
