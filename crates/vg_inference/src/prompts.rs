use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::info;
use vg_core::{Error, PromptStage, Result};
use crate::{Config, PromptStageKind};

pub const DEFAULT_PROMPT_MODEL: &str = "Ar4ikov/gpt2-650k-stable-diffusion-prompt-generator";

/// Builds the prompt stage selected in `config`.
pub fn create_prompt_stage(config: &Config, client: Client) -> Result<Arc<dyn PromptStage>> {
    match config.prompt_stage {
        PromptStageKind::Identity => Ok(Arc::new(IdentityPrompts)),
        PromptStageKind::HuggingFace => Ok(Arc::new(HuggingFacePrompts::new(
            client,
            config.huggingface_token.clone(),
            &config.huggingface_base_url,
        )?)),
    }
}

/// Uses each summary item unchanged as an image prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityPrompts;

#[async_trait]
impl PromptStage for IdentityPrompts {
    fn name(&self) -> &str {
        "identity"
    }

    async fn prompts(&self, summary: &[String]) -> Result<Vec<String>> {
        Ok(summary.to_vec())
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// Rewrites every summary item into a diffusion prompt with a text-generation
/// model on the Hugging Face inference API.
pub struct HuggingFacePrompts {
    client: Client,
    token: String,
    endpoint: String,
}

impl HuggingFacePrompts {
    pub fn new(client: Client, token: Option<String>, base_url: &str) -> Result<Self> {
        Self::with_model(client, token, base_url, DEFAULT_PROMPT_MODEL)
    }

    pub fn with_model(
        client: Client,
        token: Option<String>,
        base_url: &str,
        model: &str,
    ) -> Result<Self> {
        let token = token
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("Hugging Face token is required for the prompt stage".to_string())
            })?;
        Ok(Self {
            client,
            token,
            endpoint: format!("{}/models/{}", base_url.trim_end_matches('/'), model),
        })
    }

    async fn generate_prompt(&self, item: &str) -> Result<String> {
        let generated = self.client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&InferenceRequest { inputs: item })
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<GeneratedText>>()
            .await?;

        generated
            .into_iter()
            .next()
            .map(|g| g.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Inference(format!("No prompt generated for {:?}", item)))
    }
}

impl fmt::Debug for HuggingFacePrompts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFacePrompts")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl PromptStage for HuggingFacePrompts {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn prompts(&self, summary: &[String]) -> Result<Vec<String>> {
        let mut prompts = Vec::with_capacity(summary.len());
        for item in summary {
            info!("💬 Generating prompt for: {}", item);
            prompts.push(self.generate_prompt(item).await?);
        }
        Ok(prompts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_identity_prompts() {
        let summary = vec!["A catchy phrase".to_string(), "Another one".to_string()];
        let prompts = IdentityPrompts.prompts(&summary).await.unwrap();
        assert_eq!(prompts, summary);
    }

    #[test]
    fn test_create_prompt_stage() {
        let stage = create_prompt_stage(&Config::default(), Client::new()).unwrap();
        assert_eq!(stage.name(), "identity");

        let config = Config {
            prompt_stage: PromptStageKind::HuggingFace,
            ..Config::default()
        };
        assert!(matches!(
            create_prompt_stage(&config, Client::new()),
            Err(Error::Config(_))
        ));

        let config = Config {
            prompt_stage: PromptStageKind::HuggingFace,
            huggingface_token: Some("hf_token".to_string()),
            ..Config::default()
        };
        let stage = create_prompt_stage(&config, Client::new()).unwrap();
        assert_eq!(stage.name(), "huggingface");
    }
}
