//! Results-listing parser
//!
//! A results page lists hits as adjacent anchor pairs: a patent-number anchor
//! followed by a title anchor, both linking into the detail CGI. The first
//! page additionally carries the total hit count after an "out of" fragment.

use scraper::{Html, Selector};
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use super::context::ListParseContext;
use super::error::{ParseError, ParseResult};
use super::text::{DocumentNodes, normalize};
use super::ContextualParser;
use crate::domain::patent::PatentRecord;

/// Href fragment that identifies detail links on a results page.
const DETAIL_HREF_PATTERN: &str = "netacgi";

/// Parser extracting stub records and the total hit count from a results
/// listing page.
pub struct ResultListParser {
    anchor_selector: Selector,
    detail_href: Regex,
}

impl ResultListParser {
    pub fn new() -> ParseResult<Self> {
        let anchor_selector = Selector::parse("a[href]")
            .map_err(|_| ParseError::invalid_selector("a[href]"))?;
        let detail_href = Regex::new(DETAIL_HREF_PATTERN)
            .map_err(|_| ParseError::invalid_pattern(DETAIL_HREF_PATTERN))?;
        Ok(Self {
            anchor_selector,
            detail_href,
        })
    }

    /// Total number of hits the source reports for the query. Present only on
    /// the first results page; absence there is a fatal parse error.
    pub fn total_results(&self, html: &Html) -> ParseResult<u64> {
        let nodes = DocumentNodes::new(html);
        let anchor = nodes
            .find_text(|t| t.contains("out of"))
            .ok_or(ParseError::TotalCountMissing)?;
        let text = nodes
            .following_element_text(anchor)
            .ok_or(ParseError::TotalCountMissing)?;
        text.parse::<u64>()
            .map_err(|_| ParseError::TotalCountInvalid { text })
    }

    fn resolve_url(&self, href: &str, base_url: &str) -> ParseResult<String> {
        if href.starts_with("http") {
            return Ok(href.to_string());
        }
        let resolution_error = || ParseError::UrlResolutionFailed {
            href: href.to_string(),
            base_url: base_url.to_string(),
        };
        let base = Url::parse(base_url).map_err(|_| resolution_error())?;
        let resolved = base.join(href).map_err(|_| resolution_error())?;
        Ok(resolved.to_string())
    }
}

impl ContextualParser for ResultListParser {
    type Output = Vec<PatentRecord>;
    type Context = ListParseContext;

    /// Extract stub records from a results listing. A page without matching
    /// anchors yields an empty batch, which the orchestrator treats as the
    /// end of the listing.
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParseResult<Self::Output> {
        let mut anchors = Vec::new();
        for anchor in html.select(&self.anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !self.detail_href.is_match(href) {
                continue;
            }
            let text = normalize(&anchor.text().collect::<String>());
            if text.is_empty() {
                continue;
            }
            anchors.push((text, href.to_string()));
        }

        if anchors.len() % 2 != 0 {
            warn!(
                page_index = context.page_index,
                anchors = anchors.len(),
                "odd number of detail anchors on results page; dropping the trailing one"
            );
        }

        let mut stubs = Vec::new();
        for pair in anchors.chunks_exact(2) {
            // First anchor shows the hit number, second the title; both link
            // to the same detail page.
            let href = &pair[0].1;
            let title = &pair[1].0;
            match self.resolve_url(href, &context.base_url) {
                Ok(url) => stubs.push(PatentRecord::stub(title.clone(), url)),
                Err(e) => {
                    warn!(
                        page_index = context.page_index,
                        href = %href,
                        error = %e,
                        "skipping result entry with unresolvable detail link"
                    );
                }
            }
        }

        debug!(
            page_index = context.page_index,
            entries = stubs.len(),
            "parsed results page"
        );
        Ok(stubs)
    }
}
