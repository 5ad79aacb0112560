use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Extracted text of an article, keyed by the literal URL it was fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub main_content: String,
    pub created_at: DateTime<Utc>,
}

impl ArticleRecord {
    pub fn new(url: impl Into<String>, main_content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            main_content: main_content.into(),
            created_at: Utc::now(),
        }
    }
}

/// A validated summary, keyed by the article text (not the URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub article_content: String,
    pub summary: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl SummaryRecord {
    pub fn new(article_content: impl Into<String>, summary: Vec<String>) -> Self {
        Self {
            article_content: article_content.into(),
            summary,
            created_at: Utc::now(),
        }
    }
}

/// A generated image, keyed by `(provider, prompt)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub provider: String,
    pub prompt: String,
    pub image: ImagePayload,
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    pub fn new(
        provider: impl Into<String>,
        prompt: impl Into<String>,
        image: ImagePayload,
    ) -> Self {
        Self {
            provider: provider.into(),
            prompt: prompt.into(),
            image,
            created_at: Utc::now(),
        }
    }
}

/// Normalized output of an image provider.
///
/// Serializes as the bare string so clients see either a remote URL or an
/// inline `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImagePayload {
    Url(String),
    DataUri(String),
}

impl ImagePayload {
    pub fn png_base64(encoded: &str) -> Self {
        Self::DataUri(format!("data:image/png;base64,{}", encoded))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImagePayload::Url(s) | ImagePayload::DataUri(s) => s,
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImagePayload::DataUri(_))
    }
}

impl From<String> for ImagePayload {
    fn from(value: String) -> Self {
        if value.starts_with("data:") {
            Self::DataUri(value)
        } else {
            Self::Url(value)
        }
    }
}

impl From<ImagePayload> for String {
    fn from(value: ImagePayload) -> Self {
        match value {
            ImagePayload::Url(s) | ImagePayload::DataUri(s) => s,
        }
    }
}

impl fmt::Display for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a pipeline result: an image and the summary it illustrates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineItem {
    pub image: ImagePayload,
    pub summary: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_classification() {
        let inline = ImagePayload::from("data:image/png;base64,AAAA".to_string());
        assert!(inline.is_inline());

        let remote = ImagePayload::from("https://cdn.example.com/img.png".to_string());
        assert_eq!(remote, ImagePayload::Url("https://cdn.example.com/img.png".to_string()));
    }

    #[test]
    fn test_pipeline_item_serializes_flat() {
        let item = PipelineItem {
            image: ImagePayload::png_base64("AAAA"),
            summary: vec!["A catchy phrase".to_string()],
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "image": "data:image/png;base64,AAAA",
                "summary": ["A catchy phrase"],
            })
        );
    }
}
