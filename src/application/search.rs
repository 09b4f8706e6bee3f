//! Search orchestration
//!
//! Drives a query end to end: fetch the first results page, read the total
//! hit count, walk subsequent pages until the limit or the listing is
//! exhausted, then optionally upgrade each stub with its detail page. Listing
//! failures are fatal; per-record detail failures degrade that record to a
//! stub and leave the rest of the batch intact.

use futures::StreamExt;
use scraper::Html;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::query::{PORTAL_BASE_URL, SearchQuery};
use crate::domain::patent::{PatentRecord, SearchResultSet};
use crate::infrastructure::parsing::{
    ContextualParser, DetailParseContext, DetailParser, ListParseContext, ParseError,
    ResultListParser,
};
use crate::infrastructure::web_client::{FetchError, PageFetcher};

/// Hits per results page, fixed by the portal.
const PAGE_SIZE: u64 = 50;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("failed to fetch results page")]
    Fetch(#[from] FetchError),

    #[error("failed to parse results page")]
    Parse(#[from] ParseError),
}

/// Knobs for a single search run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Hard cap on the number of records collected.
    pub results_limit: u64,
    /// Fetch and parse the detail page of every hit. Turning this off keeps
    /// the run to one request per results page and returns stubs.
    pub fetch_details: bool,
    /// Upper bound on detail pages in flight at once.
    pub max_concurrent_detail_fetches: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            results_limit: PAGE_SIZE,
            fetch_details: true,
            max_concurrent_detail_fetches: 8,
        }
    }
}

/// Search runner tying a fetcher to the two page parsers.
pub struct SearchEngine<F: PageFetcher> {
    fetcher: F,
    list_parser: ResultListParser,
    detail_parser: DetailParser,
    options: SearchOptions,
}

impl<F: PageFetcher> SearchEngine<F> {
    pub fn new(fetcher: F) -> Result<Self, SearchError> {
        Self::with_options(fetcher, SearchOptions::default())
    }

    pub fn with_options(fetcher: F, options: SearchOptions) -> Result<Self, SearchError> {
        Ok(Self {
            fetcher,
            list_parser: ResultListParser::new()?,
            detail_parser: DetailParser::new()?,
            options,
        })
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Run `query` to completion and return the collected records in listing
    /// order.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResultSet, SearchError> {
        let first_url = query.first_page_url();
        let body = self.fetcher.fetch(&first_url).await?;
        let (total_results, batch) = self.parse_results_page(&body, 1)?;

        let target = total_results.min(self.options.results_limit);
        info!(
            total_results,
            limit = self.options.results_limit,
            "search started"
        );

        // A zero-pair page ends the walk wherever it appears; on the first
        // page that means stopping before any pagination request goes out.
        if batch.is_empty() && target > 0 {
            warn!(total_results, "first results page returned no entries");
            info!(collected = 0usize, "search finished");
            return Ok(SearchResultSet::default());
        }

        let mut records = Vec::new();
        self.collect_batch(&mut records, batch, target).await;

        // NextList indices start at 2: the portal names the control after the
        // page it leads to.
        let mut list_index: u32 = 2;
        while (records.len() as u64) < target {
            let url = query.next_page_url(total_results, list_index);
            let body = self.fetcher.fetch(&url).await?;
            let batch = self.parse_next_page(&body, list_index)?;
            if batch.is_empty() {
                // The portal claimed more hits than it serves; stop rather
                // than refetch the same empty page forever.
                warn!(
                    list_index,
                    collected = records.len(),
                    total_results,
                    "results page returned no entries before the listing was exhausted"
                );
                break;
            }
            self.collect_batch(&mut records, batch, target).await;
            list_index += 1;
        }

        info!(collected = records.len(), "search finished");
        Ok(SearchResultSet::new(records))
    }

    /// Append a page's worth of stubs, truncated to what the target still
    /// allows, upgrading each with its detail page when enabled.
    async fn collect_batch(
        &self,
        records: &mut Vec<PatentRecord>,
        mut batch: Vec<PatentRecord>,
        target: u64,
    ) {
        let remaining = (target - records.len() as u64) as usize;
        batch.truncate(remaining);
        if !self.options.fetch_details {
            records.extend(batch);
            return;
        }
        let concurrency = self.options.max_concurrent_detail_fetches.max(1);
        let mut detailed = futures::stream::iter(batch.into_iter().map(|s| self.fetch_detail(s)))
            .buffered(concurrency);
        while let Some(record) = detailed.next().await {
            records.push(record);
        }
    }

    /// Upgrade one stub with its detail page. A fetch failure keeps the stub;
    /// parsing itself never fails.
    async fn fetch_detail(&self, stub: PatentRecord) -> PatentRecord {
        match self.fetcher.fetch(&stub.url).await {
            Ok(body) => self.parse_detail_page(&body, stub),
            Err(e) => {
                warn!(url = %stub.url, error = %e, "detail fetch failed; keeping stub");
                stub
            }
        }
    }

    // The parsed DOM is not Send, so each page is parsed inside a synchronous
    // call and never held across an await.

    fn parse_results_page(
        &self,
        body: &str,
        page_index: u32,
    ) -> Result<(u64, Vec<PatentRecord>), SearchError> {
        let html = Html::parse_document(body);
        let total = self.list_parser.total_results(&html)?;
        let context = ListParseContext::new(page_index, PORTAL_BASE_URL);
        let batch = self.list_parser.parse_with_context(&html, &context)?;
        Ok((total, batch))
    }

    fn parse_next_page(
        &self,
        body: &str,
        page_index: u32,
    ) -> Result<Vec<PatentRecord>, SearchError> {
        let html = Html::parse_document(body);
        let context = ListParseContext::new(page_index, PORTAL_BASE_URL);
        Ok(self.list_parser.parse_with_context(&html, &context)?)
    }

    fn parse_detail_page(&self, body: &str, stub: PatentRecord) -> PatentRecord {
        let html = Html::parse_document(body);
        let context = DetailParseContext::new(stub.url.clone(), stub.title.clone());
        match self.detail_parser.parse_with_context(&html, &context) {
            Ok(record) => record,
            Err(e) => {
                debug!(url = %stub.url, error = %e, "detail parse failed; keeping stub");
                stub
            }
        }
    }
}
