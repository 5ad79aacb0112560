use std::sync::Arc;
use tracing::{debug, info};
use url::Url;
use vg_core::{ArticleRecord, ContentStore, Result};
use crate::fetcher::PageFetcher;
use crate::html::extract_description;

/// Turns an article URL into its canonical text, fetching each URL at most
/// once per store.
pub struct ContentExtractor {
    fetcher: Arc<dyn PageFetcher>,
    store: Arc<dyn ContentStore>,
}

impl ContentExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, store: Arc<dyn ContentStore>) -> Self {
        Self { fetcher, store }
    }

    pub async fn extract_content(&self, url: &str) -> Result<String> {
        Url::parse(url)?;

        if let Some(record) = self.store.get_article(url).await? {
            debug!("📦 Article cache hit for {}", url);
            return Ok(record.main_content);
        }

        info!("🌐 Fetching {}", url);
        let html = self.fetcher.fetch(url).await?;
        let content = extract_description(&html)?;

        self.store
            .insert_article(&ArticleRecord::new(url, content.clone()))
            .await?;
        Ok(content)
    }
}
