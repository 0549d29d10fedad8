pub mod api;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetcher;

use std::sync::Arc;
use config::Config;
use error::Result;
use extract::{ContentExtractor, TrafilaturaExtractor};
use fetcher::{BrowserFetcher, DefaultFetcher, PageFetcher};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub primary: Arc<dyn PageFetcher>,
    pub fallback: Arc<dyn PageFetcher>,
    pub extractor: Arc<dyn ContentExtractor>,
}

impl AppState {
    /// Wires the production fetchers and extractor.
    pub fn new(config: &Config) -> Result<Self> {
        let primary = BrowserFetcher::new(config.fetch_timeout)?;

        Ok(AppState {
            primary: Arc::new(primary),
            fallback: Arc::new(DefaultFetcher),
            extractor: Arc::new(TrafilaturaExtractor),
        })
    }
}
