use std::fmt;

pub mod images;
pub mod models;
pub mod prompts;
pub mod summary;

pub use images::{create_image_backend, ImageGenerator};
pub use models::create_text_model;
pub use prompts::create_prompt_stage;
pub use summary::SummaryGenerator;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_SD_URL: &str = "http://127.0.0.1:7860";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TextModelKind {
    #[default]
    #[value(name = "openai")]
    OpenAi,
    Dummy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImageBackendKind {
    /// OpenAI images API, returns remote URLs
    Hosted,
    /// AUTOMATIC1111-compatible diffusion server, returns inline data URIs
    #[default]
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PromptStageKind {
    /// Every image is generated straight from the summary
    #[default]
    Identity,
    /// Rewrite each summary item with a Hugging Face prompt generator
    #[value(name = "huggingface")]
    HuggingFace,
}

/// Everything the factories need to build the generation components.
#[derive(Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub openai_base_url: String,
    pub text_model: TextModelKind,
    pub image_backend: ImageBackendKind,
    pub sd_url: String,
    pub huggingface_token: Option<String>,
    pub huggingface_base_url: String,
    pub prompt_stage: PromptStageKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            text_model: TextModelKind::default(),
            image_backend: ImageBackendKind::default(),
            sd_url: DEFAULT_SD_URL.to_string(),
            huggingface_token: None,
            huggingface_base_url: DEFAULT_HUGGINGFACE_BASE_URL.to_string(),
            prompt_stage: PromptStageKind::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("text_model", &self.text_model)
            .field("image_backend", &self.image_backend)
            .field("sd_url", &self.sd_url)
            .field("huggingface_token", &self.huggingface_token.as_deref().map(|_| "<redacted>"))
            .field("huggingface_base_url", &self.huggingface_base_url)
            .field("prompt_stage", &self.prompt_stage)
            .finish()
    }
}

pub mod prelude {
    pub use super::{Config, ImageBackendKind, PromptStageKind, TextModelKind};
    pub use super::{create_image_backend, create_prompt_stage, create_text_model};
    pub use super::{ImageGenerator, SummaryGenerator};
    pub use vg_core::{Error, Result};
}
