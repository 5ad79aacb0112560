use async_trait::async_trait;
use crate::types::{ArticleRecord, ImageRecord, SummaryRecord};
use crate::Result;

/// Content-addressed cache behind every costly pipeline stage.
///
/// Keys are matched exactly as given. Implementations scope each call to a
/// single read or write and hold nothing across calls.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up extracted article text by URL
    async fn get_article(&self, url: &str) -> Result<Option<ArticleRecord>>;

    /// Insert an article; an existing row for the same URL is kept
    async fn insert_article(&self, record: &ArticleRecord) -> Result<()>;

    /// Look up a summary by the article text it was generated from
    async fn get_summary(&self, article_content: &str) -> Result<Option<SummaryRecord>>;

    /// Insert or replace a summary
    async fn upsert_summary(&self, record: &SummaryRecord) -> Result<()>;

    /// Look up an image generated by `provider` for `prompt`
    async fn get_image(&self, provider: &str, prompt: &str) -> Result<Option<ImageRecord>>;

    /// Insert or replace an image
    async fn upsert_image(&self, record: &ImageRecord) -> Result<()>;
}
