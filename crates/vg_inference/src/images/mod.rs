use futures::future::join_all;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};
use vg_core::{ContentStore, Error, ImageBackend, ImagePayload, ImageRecord, Result};
use crate::{Config, ImageBackendKind};

pub mod hosted;
pub mod local;

pub use hosted::HostedImageBackend;
pub use local::LocalImageBackend;

/// Builds the image provider selected in `config`.
pub fn create_image_backend(config: &Config, client: Client) -> Result<Arc<dyn ImageBackend>> {
    let backend: Arc<dyn ImageBackend> = match config.image_backend {
        ImageBackendKind::Hosted => Arc::new(HostedImageBackend::new(
            client,
            config.api_key.clone(),
            &config.openai_base_url,
        )?),
        ImageBackendKind::Local => Arc::new(LocalImageBackend::new(client, &config.sd_url)),
    };
    debug!("Image backend selected: {}", backend.name());
    Ok(backend)
}

/// Decodes a provider response, reporting bad statuses and malformed bodies
/// as backend response errors.
pub(crate) async fn read_provider_json<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(Error::backend(provider, format!("HTTP {}", status)));
    }
    let body = response.text().await?;
    serde_json::from_str(&body)
        .map_err(|e| Error::backend(provider, format!("malformed response: {}", e)))
}

/// Caching front for an [`ImageBackend`].
///
/// Images are keyed by provider name and prompt, so switching providers never
/// serves a payload of the other shape.
#[derive(Clone)]
pub struct ImageGenerator {
    backend: Arc<dyn ImageBackend>,
    store: Arc<dyn ContentStore>,
}

impl ImageGenerator {
    pub fn new(backend: Arc<dyn ImageBackend>, store: Arc<dyn ContentStore>) -> Self {
        Self { backend, store }
    }

    pub fn provider(&self) -> &str {
        self.backend.name()
    }

    pub async fn generate_image(&self, prompt: &str) -> Result<ImagePayload> {
        let provider = self.backend.name();
        if let Some(record) = self.store.get_image(provider, prompt).await? {
            debug!("📦 Image cache hit for prompt {:?}", prompt);
            return Ok(record.image);
        }

        info!("🎨 Generating image with {} for prompt {:?}", provider, prompt);
        let image = self.backend.generate_image(prompt).await?;
        self.store
            .upsert_image(&ImageRecord::new(provider, prompt, image.clone()))
            .await?;
        Ok(image)
    }

    /// Generates one image per prompt concurrently.
    ///
    /// Every call runs to completion; if any failed, the first error is
    /// returned and no images are.
    pub async fn generate_images(&self, prompts: &[String]) -> Result<Vec<ImagePayload>> {
        let futures = prompts.iter().map(|prompt| self.generate_image(prompt));
        join_all(futures).await.into_iter().collect()
    }
}
