//! Article extraction: runs trafilatura over the document and emits the
//! result as a structured JSON record.

use rs_trafilatura::{extract_with_options, Options};
use serde::{Deserialize, Serialize};
use url::Url;
use crate::error::Result;

/// Label reported in every response for the extraction technique.
pub const METHOD: &str = "trafilatura";

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub include_comments: bool,
    pub include_tables: bool,
}

impl From<ExtractOptions> for Options {
    fn from(options: ExtractOptions) -> Self {
        Options {
            include_comments: options.include_comments,
            include_tables: options.include_tables,
            ..Options::default()
        }
    }
}

pub trait ContentExtractor: Send + Sync {
    /// Returns the structured JSON record for the main content of `html`,
    /// or `None` when nothing resembling an article was found.
    fn extract(&self, html: &str, url: &str, options: ExtractOptions) -> Result<Option<String>>;
}

/// Fields of the structured record the service cares about. Anything may
/// be missing or null.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractedFields {
    pub title: Option<String>,
    pub text: Option<String>,
    pub language: Option<String>,
}

impl ExtractedFields {
    pub fn parse(record: &str) -> Result<Self> {
        Ok(serde_json::from_str(record)?)
    }
}

#[derive(Serialize)]
struct Record {
    title: Option<String>,
    author: Option<String>,
    hostname: Option<String>,
    description: Option<String>,
    sitename: Option<String>,
    source: String,
    text: String,
    language: Option<String>,
}

pub struct TrafilaturaExtractor;

impl ContentExtractor for TrafilaturaExtractor {
    fn extract(&self, html: &str, url: &str, options: ExtractOptions) -> Result<Option<String>> {
        let result = match extract_with_options(html, &options.into()) {
            Ok(result) => result,
            Err(e) => {
                tracing::debug!("trafilatura found no content in {}: {}", url, e);
                return Ok(None);
            }
        };

        let text = result.content_text.trim();
        if text.is_empty() {
            tracing::debug!("trafilatura returned empty content for {}: {:?}", url, result.warnings);
            return Ok(None);
        }

        let metadata = result.metadata;
        let record = Record {
            title: metadata.title,
            author: metadata.author,
            hostname: Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_owned)),
            description: metadata.description,
            sitename: metadata.sitename,
            source: url.to_string(),
            text: text.to_string(),
            language: metadata.language,
        };

        Ok(Some(serde_json::to_string(&record)?))
    }
}
