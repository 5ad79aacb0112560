use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use vg_core::{ArticleRecord, ContentStore, ImageRecord, Result, SummaryRecord};

#[derive(Default)]
pub struct MemoryStore {
    articles: HashMap<String, ArticleRecord>,
    summaries: HashMap<String, SummaryRecord>,
    images: HashMap<(String, String), ImageRecord>,
}

impl MemoryStore {
    pub fn insert_article(&mut self, record: &ArticleRecord) {
        self.articles
            .entry(record.url.clone())
            .or_insert_with(|| record.clone());
    }

    pub fn upsert_summary(&mut self, record: &SummaryRecord) {
        self.summaries
            .insert(record.article_content.clone(), record.clone());
    }

    pub fn upsert_image(&mut self, record: &ImageRecord) {
        self.images.insert(
            (record.provider.clone(), record.prompt.clone()),
            record.clone(),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.summaries.is_empty() && self.images.is_empty()
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no collection holds a record
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Number of rows per collection: (articles, summaries, images)
    pub async fn counts(&self) -> (usize, usize, usize) {
        let store = self.store.read().await;
        (store.articles.len(), store.summaries.len(), store.images.len())
    }
}

#[async_trait]
impl ContentStore for InMemoryStorage {
    async fn get_article(&self, url: &str) -> Result<Option<ArticleRecord>> {
        let store = self.store.read().await;
        Ok(store.articles.get(url).cloned())
    }

    async fn insert_article(&self, record: &ArticleRecord) -> Result<()> {
        let mut store = self.store.write().await;
        store.insert_article(record);
        Ok(())
    }

    async fn get_summary(&self, article_content: &str) -> Result<Option<SummaryRecord>> {
        let store = self.store.read().await;
        Ok(store.summaries.get(article_content).cloned())
    }

    async fn upsert_summary(&self, record: &SummaryRecord) -> Result<()> {
        let mut store = self.store.write().await;
        store.upsert_summary(record);
        Ok(())
    }

    async fn get_image(&self, provider: &str, prompt: &str) -> Result<Option<ImageRecord>> {
        let store = self.store.read().await;
        Ok(store
            .images
            .get(&(provider.to_string(), prompt.to_string()))
            .cloned())
    }

    async fn upsert_image(&self, record: &ImageRecord) -> Result<()> {
        let mut store = self.store.write().await;
        store.upsert_image(record);
        Ok(())
    }
}
