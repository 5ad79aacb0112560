use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The source article could not be reached or answered with a non-2xx status.
    #[error("Fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The article markup did not contain the expected description field.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The text model never produced a valid array within the attempt bound.
    #[error("Failed to generate a valid summary after {attempts} attempts")]
    SummaryGeneration { attempts: usize },

    /// An image provider answered with an unusable payload.
    #[error("Backend response error from {provider}: {reason}")]
    BackendResponse { provider: String, reason: String },

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    pub fn backend(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BackendResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::SummaryGeneration { attempts: 3 };
        assert_eq!(
            err.to_string(),
            "Failed to generate a valid summary after 3 attempts"
        );

        let err = Error::fetch("https://example.com/a", "HTTP 404 Not Found");
        assert_eq!(
            err.to_string(),
            "Fetch error for https://example.com/a: HTTP 404 Not Found"
        );

        let err = Error::backend("local", "no images returned");
        assert_eq!(
            err.to_string(),
            "Backend response error from local: no images returned"
        );
    }

    #[test]
    fn test_invalid_url_conversion() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }
}
