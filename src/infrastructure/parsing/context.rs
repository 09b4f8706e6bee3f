//! Parsing contexts carried alongside raw HTML
//!
//! Context objects hold the out-of-band facts a parser needs: which page of
//! the result listing is being read, and which patent a detail page belongs
//! to.

/// Context for parsing one results-listing page.
#[derive(Debug, Clone)]
pub struct ListParseContext {
    /// 1-based index of the results page within the pagination sequence.
    pub page_index: u32,

    /// Base URL for resolving relative detail links.
    pub base_url: String,
}

impl ListParseContext {
    pub fn new(page_index: u32, base_url: impl Into<String>) -> Self {
        Self {
            page_index,
            base_url: base_url.into(),
        }
    }
}

/// Context for parsing one patent detail page.
///
/// Title and URL come from the results listing and are the only fields a
/// record is guaranteed to have.
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    pub url: String,
    pub title: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}
