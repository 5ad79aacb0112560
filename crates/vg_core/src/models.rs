use async_trait::async_trait;
use crate::types::ImagePayload;
use crate::Result;

#[async_trait]
pub trait TextModel: Send + Sync {
    fn name(&self) -> &str;

    /// Complete `prompt`, spending at most `max_tokens` on the answer
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Stable provider name, also used to namespace cached images
    fn name(&self) -> &str;

    /// Generate one image for `prompt`
    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload>;
}

/// Turns a summary into the prompts that images are generated from.
#[async_trait]
pub trait PromptStage: Send + Sync {
    fn name(&self) -> &str;

    async fn prompts(&self, summary: &[String]) -> Result<Vec<String>>;
}
