use std::sync::Arc;
use reqwest::Client;
use vg_core::{Result, TextModel};
use crate::{Config, TextModelKind};

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Builds the text model selected in `config`, sharing `client` for HTTP.
pub fn create_text_model(config: &Config, client: Client) -> Result<Arc<dyn TextModel>> {
    let model: Arc<dyn TextModel> = match config.text_model {
        TextModelKind::OpenAi => Arc::new(OpenAiModel::new(
            client,
            config.api_key.clone(),
            &config.openai_base_url,
        )?),
        TextModelKind::Dummy => Arc::new(DummyModel::new()),
    };
    tracing::debug!("Text model selected: {}", model.name());
    Ok(model)
}
