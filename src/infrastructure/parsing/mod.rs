//! HTML parsing infrastructure for the search portal
//!
//! Two parsers cover the portal's two page shapes: the results listing
//! (anchor pairs plus a total hit count) and the single-patent detail page
//! (label-anchored fields). Both consume pre-fetched HTML; no I/O happens
//! here.

pub mod context;
pub mod detail_parser;
pub mod error;
pub mod result_list_parser;
pub mod text;

pub use context::{DetailParseContext, ListParseContext};
pub use detail_parser::DetailParser;
pub use error::{ParseError, ParseResult};
pub use result_list_parser::ResultListParser;

use scraper::Html;

/// Parser trait with context support: the context carries the out-of-band
/// facts (page index, owning patent) that the raw HTML does not.
pub trait ContextualParser {
    type Output;
    type Context;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParseResult<Self::Output>;
}
