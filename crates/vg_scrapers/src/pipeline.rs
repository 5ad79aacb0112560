use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use vg_core::{Error, PipelineItem, PromptStage};
use vg_inference::prompts::IdentityPrompts;
use vg_inference::{ImageGenerator, SummaryGenerator};
use crate::extractor::ContentExtractor;
use crate::logging::Logger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extraction,
    Summary,
    Prompts,
    ImageGeneration,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extraction => "extraction",
            Stage::Summary => "summary",
            Stage::Prompts => "prompts",
            Stage::ImageGeneration => "image_generation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline failure, tagged with the stage that produced it.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to extract article content: {0}")]
    ExtractionFailed(#[source] Error),

    #[error("Failed to generate article summary: {0}")]
    SummaryFailed(#[source] Error),

    #[error("Failed to generate image prompts: {0}")]
    PromptsFailed(#[source] Error),

    #[error("Failed to generate images: {0}")]
    ImageGenerationFailed(#[source] Error),
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::ExtractionFailed(_) => Stage::Extraction,
            PipelineError::SummaryFailed(_) => Stage::Summary,
            PipelineError::PromptsFailed(_) => Stage::Prompts,
            PipelineError::ImageGenerationFailed(_) => Stage::ImageGeneration,
        }
    }

    pub fn cause(&self) -> &Error {
        match self {
            PipelineError::ExtractionFailed(e)
            | PipelineError::SummaryFailed(e)
            | PipelineError::PromptsFailed(e)
            | PipelineError::ImageGenerationFailed(e) => e,
        }
    }

    /// Client-facing message that reveals nothing about the cause
    pub fn public_message(&self) -> &'static str {
        match self.stage() {
            Stage::Extraction => "Failed to extract article content",
            Stage::Summary => "Failed to generate article summary",
            Stage::Prompts => "Failed to generate image prompts",
            Stage::ImageGeneration => "Failed to generate images",
        }
    }
}

/// Extract, summarize, derive prompts, then fan out image generation.
///
/// Each stage consults the store on its own; the first failing stage ends the
/// run and nothing partial is returned.
pub struct Pipeline {
    extractor: ContentExtractor,
    summaries: SummaryGenerator,
    prompts: Arc<dyn PromptStage>,
    images: ImageGenerator,
}

impl Pipeline {
    pub fn new(
        extractor: ContentExtractor,
        summaries: SummaryGenerator,
        images: ImageGenerator,
    ) -> Self {
        Self {
            extractor,
            summaries,
            prompts: Arc::new(IdentityPrompts),
            images,
        }
    }

    pub fn with_prompt_stage(mut self, prompts: Arc<dyn PromptStage>) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn image_provider(&self) -> &str {
        self.images.provider()
    }

    pub async fn run(&self, url: &str) -> Result<Vec<PipelineItem>, PipelineError> {
        let logger = Logger::new().with_prefix(format!("[{}]", url));

        let result = self.run_stages(url, &logger).await;
        match &result {
            Ok(items) => {
                logger.info(&format!("✅ Pipeline completed with {} images", items.len()))
            }
            Err(e) => logger.error(&format!("❌ {} stage failed: {}", e.stage(), e.cause())),
        }
        result
    }

    async fn run_stages(
        &self,
        url: &str,
        logger: &Logger,
    ) -> Result<Vec<PipelineItem>, PipelineError> {
        logger.info("📰 Extracting article content");
        let content = self.extractor
            .extract_content(url)
            .await
            .map_err(PipelineError::ExtractionFailed)?;
        logger.debug(&format!("Article content: {}", content));

        logger.info("🤖 Summarizing article");
        let summary = self.summaries
            .generate_summary(&content)
            .await
            .map_err(PipelineError::SummaryFailed)?;

        logger.info(&format!("💬 Building prompts ({})", self.prompts.name()));
        let prompts = self.prompts
            .prompts(&summary)
            .await
            .map_err(PipelineError::PromptsFailed)?;
        if prompts.is_empty() {
            return Err(PipelineError::PromptsFailed(Error::Inference(
                "Prompt stage produced no prompts".to_string(),
            )));
        }

        logger.info(&format!(
            "🎨 Generating {} images with {}",
            prompts.len(),
            self.images.provider()
        ));
        let images = self.images
            .generate_images(&prompts)
            .await
            .map_err(PipelineError::ImageGenerationFailed)?;

        Ok(images
            .into_iter()
            .map(|image| PipelineItem {
                image,
                summary: summary.clone(),
            })
            .collect())
    }
}
