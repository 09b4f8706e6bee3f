//! Domain types produced by a search.

pub mod patent;

pub use patent::{Inventor, PatentRecord, SearchResultSet};
