use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use vg_core::{Error, Result};

pub const USER_AGENT: &str = concat!("vignette/", env!("CARGO_PKG_VERSION"));

/// HTTP GET capability used to download article markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the body of `url`; network failures and non-2xx statuses are
    /// `Error::Fetch`
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Builds the client shared by every outbound component.
///
/// No timeout is applied unless one is given.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url, format!("HTTP {}", status)));
        }

        response.text().await.map_err(|e| Error::fetch(url, e))
    }
}
