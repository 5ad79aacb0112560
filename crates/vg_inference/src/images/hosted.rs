use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use vg_core::{Error, ImageBackend, ImagePayload, Result};
use super::read_provider_json;

pub const PROVIDER: &str = "hosted";

const IMAGE_MODEL: &str = "dall-e-3";
const IMAGE_SIZE: &str = "1024x1024";
const IMAGE_QUALITY: &str = "standard";

#[derive(Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u8,
}

#[derive(Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

/// OpenAI images API. Produces remote URLs.
pub struct HostedImageBackend {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HostedImageBackend {
    pub fn new(client: Client, api_key: Option<String>, base_url: &str) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("OpenAI API key is required for the hosted image backend".to_string())
            })?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl fmt::Debug for HostedImageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostedImageBackend")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl ImageBackend for HostedImageBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload> {
        let request = ImageGenerationRequest {
            model: IMAGE_MODEL,
            prompt,
            size: IMAGE_SIZE,
            quality: IMAGE_QUALITY,
            n: 1,
        };

        let response = self.client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let response: ImageGenerationResponse = read_provider_json(PROVIDER, response).await?;

        response
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.trim().is_empty())
            .map(ImagePayload::Url)
            .ok_or_else(|| Error::backend(PROVIDER, "response contained no image URL"))
    }
}
