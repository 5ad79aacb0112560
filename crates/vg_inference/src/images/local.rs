use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use vg_core::{Error, ImageBackend, ImagePayload, Result};
use super::read_provider_json;

pub const PROVIDER: &str = "local";

pub const STYLE_SUFFIX: &str = ",monochrome, manga";
pub const NEGATIVE_PROMPT: &str = "worst quality, low quality, medium quality, deleted, lowres, \
    bad anatomy, bad hands, text, error, missing fingers, extra digit, fewer digits, cropped, \
    jpeg artifacts, signature, watermark, username, blurry";

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;
const SAMPLER: &str = "DPM++ 2M Karras";
const STEPS: u32 = 50;

#[derive(Serialize)]
struct Txt2ImgRequest<'a> {
    prompt: String,
    negative_prompt: &'a str,
    width: u32,
    height: u32,
    sampler_name: &'a str,
    steps: u32,
}

#[derive(Deserialize)]
struct Txt2ImgResponse {
    #[serde(default)]
    images: Vec<String>,
}

/// Diffusion server speaking the AUTOMATIC1111 web UI API. Produces inline
/// PNG data URIs.
#[derive(Debug)]
pub struct LocalImageBackend {
    client: Client,
    base_url: String,
}

impl LocalImageBackend {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn is_base64(payload: &str) -> bool {
    if payload.is_empty() || payload.len() % 4 != 0 {
        return false;
    }
    let body = payload.trim_end_matches('=');
    payload.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/')
}

#[async_trait]
impl ImageBackend for LocalImageBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate_image(&self, prompt: &str) -> Result<ImagePayload> {
        let request = Txt2ImgRequest {
            prompt: format!("{}{}", prompt, STYLE_SUFFIX),
            negative_prompt: NEGATIVE_PROMPT,
            width: WIDTH,
            height: HEIGHT,
            sampler_name: SAMPLER,
            steps: STEPS,
        };
        tracing::debug!("txt2img prompt: {}", request.prompt);

        let response = self.client
            .post(format!("{}/sdapi/v1/txt2img", self.base_url))
            .json(&request)
            .send()
            .await?;
        let response: Txt2ImgResponse = read_provider_json(PROVIDER, response).await?;

        let encoded = response
            .images
            .into_iter()
            .next()
            .ok_or_else(|| Error::backend(PROVIDER, "response contained no images"))?;
        if !is_base64(&encoded) {
            return Err(Error::backend(PROVIDER, "image is not base64 encoded"));
        }

        Ok(ImagePayload::png_base64(&encoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_base64() {
        assert!(is_base64("AAAA"));
        assert!(is_base64("iVBORw0KGgo="));
        assert!(is_base64("ab+/cd=="));
        assert!(!is_base64(""));
        assert!(!is_base64("AAA"));
        assert!(!is_base64("not base64!"));
        assert!(!is_base64("A==="));
    }
}
