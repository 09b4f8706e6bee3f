//! End-to-end search flow against canned portal pages.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use patft::{
    FetchError, FieldCode, PageFetcher, SearchEngine, SearchOptions, SearchQuery,
};

/// Serves pre-registered pages and records every URL it is asked for.
struct FakeFetcher {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    log: Mutex<Vec<String>>,
}

impl FakeFetcher {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing: HashSet::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    fn failing(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    fn fetched_urls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.log.lock().unwrap().push(url.to_string());
        if self.failing.contains(url) {
            return Err(FetchError::DriverNotConfigured);
        }
        match self.pages.get(url) {
            Some(body) => Ok(body.clone()),
            None => panic!("unexpected fetch: {url}"),
        }
    }
}

fn detail_url(index: usize) -> String {
    format!("http://patft.uspto.gov/netacgi/nph-Parser?detail={index}")
}

/// Results listing with `count` hit pairs starting at `first_index`, reporting
/// `total` hits after the "out of" fragment.
fn results_page(total: u64, first_index: usize, count: usize) -> String {
    let mut body = format!("<html><body><i>out of</i> <b>{total}</b><br>");
    for i in first_index..first_index + count {
        body.push_str(&format!(
            "<a href=\"/netacgi/nph-Parser?detail={i}\">{}</a>\
             <a href=\"/netacgi/nph-Parser?detail={i}\">Patent number {i}</a><br>",
            i + 1
        ));
    }
    body.push_str("</body></html>");
    body
}

fn detail_page(number: &str) -> String {
    format!(
        "<html><body>\
         <font size=\"+1\">United States Patent </font><b>{number}</b><br>\
         <table width=\"100%\"><tr>\
         <td align=\"left\" width=\"50%\"><b>Smith</b></td>\
         <td align=\"right\" width=\"50%\"><b>June 1, 2021</b></td>\
         </tr></table>\
         <center><b><i>Abstract</i></b></center>\
         <p>A device.</p>\
         </body></html>"
    )
}

fn query() -> SearchQuery {
    SearchQuery::new().field(FieldCode::Title, "widget")
}

#[tokio::test]
async fn results_limit_truncates_without_extra_page_fetches() {
    let query = query();
    let fetcher = FakeFetcher::new().page(query.first_page_url(), results_page(100, 0, 50));
    let options = SearchOptions {
        results_limit: 10,
        fetch_details: false,
        ..SearchOptions::default()
    };
    let engine = SearchEngine::with_options(fetcher, options).unwrap();

    let results = engine.search(&query).await.unwrap();
    assert_eq!(results.len(), 10);
    assert_eq!(results.records[0].title, "Patent number 0");
    assert_eq!(results.records[9].title, "Patent number 9");
    assert!(results.iter().all(|r| !r.fetched_details));
}

#[tokio::test]
async fn pagination_walks_next_lists_in_order() {
    let query = query();
    let fetcher = FakeFetcher::new()
        .page(query.first_page_url(), results_page(120, 0, 50))
        .page(query.next_page_url(120, 2), results_page(120, 50, 50))
        .page(query.next_page_url(120, 3), results_page(120, 100, 20));
    let options = SearchOptions {
        results_limit: 200,
        fetch_details: false,
        ..SearchOptions::default()
    };
    let engine = SearchEngine::with_options(fetcher, options).unwrap();

    let results = engine.search(&query).await.unwrap();
    assert_eq!(results.len(), 120);
    assert_eq!(results.records[50].title, "Patent number 50");
    assert_eq!(results.records[119].title, "Patent number 119");

    let urls = engine_fetched_urls(&engine);
    assert_eq!(
        urls,
        vec![
            query.first_page_url(),
            query.next_page_url(120, 2),
            query.next_page_url(120, 3),
        ]
    );
}

#[tokio::test]
async fn empty_intermediate_page_stops_the_walk() {
    let query = query();
    let fetcher = FakeFetcher::new()
        .page(query.first_page_url(), results_page(100, 0, 50))
        // Page claims 100 hits but the second listing serves none.
        .page(
            query.next_page_url(100, 2),
            "<html><body><p>No hits.</p></body></html>".to_string(),
        );
    let options = SearchOptions {
        results_limit: 100,
        fetch_details: false,
        ..SearchOptions::default()
    };
    let engine = SearchEngine::with_options(fetcher, options).unwrap();

    let results = engine.search(&query).await.unwrap();
    assert_eq!(results.len(), 50);
    assert_eq!(engine_fetched_urls(&engine).len(), 2);
}

#[tokio::test]
async fn empty_first_page_stops_before_any_pagination() {
    let query = query();
    // First page claims 100 hits but serves no entry pairs; the walk must
    // end without requesting a NextList page.
    let fetcher = FakeFetcher::new().page(query.first_page_url(), results_page(100, 0, 0));
    let options = SearchOptions {
        results_limit: 100,
        fetch_details: false,
        ..SearchOptions::default()
    };
    let engine = SearchEngine::with_options(fetcher, options).unwrap();

    let results = engine.search(&query).await.unwrap();
    assert!(results.is_empty());
    assert_eq!(engine_fetched_urls(&engine), vec![query.first_page_url()]);
}

#[tokio::test]
async fn detail_pages_upgrade_stubs_in_listing_order() {
    let query = query();
    let fetcher = FakeFetcher::new()
        .page(query.first_page_url(), results_page(2, 0, 2))
        .page(detail_url(0), detail_page("10,000,001"))
        .page(detail_url(1), detail_page("10,000,002"));
    let engine = SearchEngine::new(fetcher).unwrap();

    let results = engine.search(&query).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.records[0].fetched_details);
    assert_eq!(
        results.records[0].patent_number.as_deref(),
        Some("10,000,001")
    );
    assert_eq!(
        results.records[1].patent_number.as_deref(),
        Some("10,000,002")
    );
    assert_eq!(results.records[0].patent_date.as_deref(), Some("June 1, 2021"));
    assert_eq!(results.records[0].abstract_text.as_deref(), Some("A device."));
}

#[tokio::test]
async fn failed_detail_fetch_keeps_the_stub() {
    let query = query();
    let fetcher = FakeFetcher::new()
        .page(query.first_page_url(), results_page(2, 0, 2))
        .page(detail_url(0), detail_page("10,000,001"))
        .failing(detail_url(1));
    let engine = SearchEngine::new(fetcher).unwrap();

    let results = engine.search(&query).await.unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.records[0].fetched_details);
    assert!(!results.records[1].fetched_details);
    assert_eq!(results.records[1].title, "Patent number 1");
    assert_eq!(results.records[1].patent_number, None);
}

#[tokio::test]
async fn stub_only_search_issues_no_detail_fetches() {
    let query = query();
    let fetcher = FakeFetcher::new().page(query.first_page_url(), results_page(3, 0, 3));
    let options = SearchOptions {
        fetch_details: false,
        ..SearchOptions::default()
    };
    let engine = SearchEngine::with_options(fetcher, options).unwrap();

    let results = engine.search(&query).await.unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(engine_fetched_urls(&engine), vec![query.first_page_url()]);
}

#[tokio::test]
async fn failing_first_page_is_fatal() {
    let query = query();
    let fetcher = FakeFetcher::new().failing(query.first_page_url());
    let engine = SearchEngine::new(fetcher).unwrap();
    assert!(engine.search(&query).await.is_err());
}

fn engine_fetched_urls(engine: &SearchEngine<FakeFetcher>) -> Vec<String> {
    engine.fetcher().fetched_urls()
}
