use serde::{Deserialize, Serialize};
use url::Url;

use crate::extract::{ExtractedFields, METHOD};

/// Language reported when the extractor couldn't tell.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// An absolute `http`/`https` URL. Rejected during deserialization
/// otherwise, so bad input never reaches a handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct HttpUrl(Url);

impl HttpUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for HttpUrl {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let url = Url::parse(raw.trim()).map_err(|e| format!("invalid URL: {}", e))?;
        match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Ok(HttpUrl(url)),
            scheme => Err(format!("URL scheme should be 'http' or 'https', got '{}'", scheme)),
        }
    }
}

impl std::fmt::Display for HttpUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub url: HttpUrl,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ExtractResponse {
    pub title: String,
    pub text: String,
    pub length: usize,
    pub language: String,
    pub method: String,
}

impl From<ExtractedFields> for ExtractResponse {
    fn from(fields: ExtractedFields) -> Self {
        let title = fields.title.unwrap_or_default();
        let text = fields.text.unwrap_or_default();
        let language = fields
            .language
            .filter(|language| !language.is_empty())
            .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

        ExtractResponse {
            length: text.chars().count(),
            title,
            text,
            language,
            method: METHOD.to_string(),
        }
    }
}
