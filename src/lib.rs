//! Client library for the USPTO full-text patent search portal
//!
//! Builds field-scoped queries, walks the paginated results listing, and
//! parses each patent's detail page into a structured record. Fetching is
//! behind the [`PageFetcher`] trait: the bundled [`WebClient`] does plain
//! HTTP by default and can drive a WebDriver session instead for
//! script-rendered variants of the portal.
//!
//! ```no_run
//! use patft::{FieldCode, SearchEngine, SearchQuery, WebClient, WebClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = WebClient::new(WebClientConfig::default())?;
//! let engine = SearchEngine::new(client)?;
//! let query = SearchQuery::new()
//!     .field(FieldCode::Title, "fidget spinner")
//!     .field(FieldCode::AssigneeName, "Acme");
//! let results = engine.search(&query).await?;
//! for patent in results.iter() {
//!     println!("{} {}", patent.title, patent.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::query::{FieldCode, SearchQuery};
pub use application::search::{SearchEngine, SearchError, SearchOptions};
pub use domain::patent::{Inventor, PatentRecord, SearchResultSet};
pub use infrastructure::parsing::{ParseError, ParseResult};
pub use infrastructure::web_client::{
    DEFAULT_USER_AGENT, FetchError, PageFetcher, WebClient, WebClientConfig,
};
