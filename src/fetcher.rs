use async_trait::async_trait;
use reqwest::{redirect, Client, ClientBuilder, StatusCode};
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::error::{AppError, FetchError, Result};

/// Identity sent by the primary fetcher. Plenty of publishers refuse
/// anything that doesn't look like a desktop browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_USER_AGENT: &str = concat!("raindrop-extract/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_REDIRECTS: usize = 2;
pub const MIN_FILE_SIZE: usize = 10;
pub const MAX_FILE_SIZE: usize = 20_000_000;

// Shared client for the generic downloader, mirroring the defaults an
// extraction library ships with.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .user_agent(DEFAULT_USER_AGENT)
        .timeout(DEFAULT_TIMEOUT)
        .redirect(redirect::Policy::limited(MAX_REDIRECTS))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Something that can turn a URL into a raw HTML document.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// Direct download with a browser identity and a hard timeout. Any
/// non-success status is an error.
pub struct BrowserFetcher {
    client: Client,
}

impl BrowserFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let html = response.text().await?;
        Ok(html)
    }
}

/// The generic, parameterless downloader used when the primary fetch fails.
pub struct DefaultFetcher;

#[async_trait]
impl PageFetcher for DefaultFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<String, FetchError> {
        fetch_url(url).await
    }
}

/// Downloads `url` with the library defaults: own user agent, 30s timeout,
/// at most two redirects, nothing but `200 OK`, and a sanity window on the
/// body size.
pub async fn fetch_url(url: &str) -> std::result::Result<String, FetchError> {
    let response = CLIENT.get(url).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status));
    }

    if let Some(declared) = response.content_length() {
        if declared as usize > MAX_FILE_SIZE {
            return Err(FetchError::BodySize(declared as usize));
        }
    }

    let html = response.text().await?;
    check_body_size(html.len())?;
    Ok(html)
}

fn check_body_size(len: usize) -> std::result::Result<(), FetchError> {
    if (MIN_FILE_SIZE..=MAX_FILE_SIZE).contains(&len) {
        Ok(())
    } else {
        Err(FetchError::BodySize(len))
    }
}
