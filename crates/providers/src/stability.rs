//! Stability AI adapter (`stability` provider).
//!
//! Uses the stable-image generation endpoint in image-to-image mode with
//! `accept: image/*`, so successful responses are raw PNG bytes. The API
//! has no batch parameter, so continuation issues sequential calls.

use reqwest::multipart::{Form, Part};

use crate::error::ProviderError;
use crate::types::{
    ContinuationRequest, FrameRequest, GeneratedImage, ImageProvider, PoseRequest,
    ProviderMetadata,
};

/// Provider name used in records and overrides.
pub const PROVIDER_NAME: &str = "stability";

/// Upstream model identifier.
const MODEL: &str = "sd3.5-large";

const GENERATE_URL: &str = "https://api.stability.ai/v2beta/stable-image/generate/sd3";

/// How strongly the init image constrains the output. High enough to keep
/// the character recognizable, low enough to allow a new pose or scene.
const IMAGE_STRENGTH: &str = "0.6";

/// Adapter for the Stability AI REST API.
pub struct StabilityProvider {
    client: reqwest::Client,
    api_key: String,
}

impl StabilityProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Issue one image-to-image call and return the raw PNG bytes.
    async fn generate(&self, prompt: &str, init_image: Vec<u8>) -> Result<Vec<u8>, ProviderError> {
        let image_part = Part::bytes(init_image)
            .file_name("init.png")
            .mime_str("image/png")
            .map_err(|e| ProviderError::Decode(format!("Invalid mime type: {e}")))?;

        let form = Form::new()
            .text("prompt", prompt.to_string())
            .text("model", MODEL)
            .text("mode", "image-to-image")
            .text("strength", IMAGE_STRENGTH)
            .text("output_format", "png")
            .part("image", image_part);

        let response = self
            .client
            .post(GENERATE_URL)
            .bearer_auth(&self.api_key)
            .header("accept", "image/*")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ProviderError::Decode("Response body was empty".into()));
        }
        Ok(bytes.to_vec())
    }

    fn wrap(&self, prompt: &str, bytes: Vec<u8>) -> GeneratedImage {
        GeneratedImage {
            bytes,
            metadata: ProviderMetadata::generated(PROVIDER_NAME, Some(MODEL), prompt),
        }
    }
}

#[async_trait::async_trait]
impl ImageProvider for StabilityProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate_pose(
        &self,
        request: &PoseRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        let bytes = self
            .generate(&request.prompt, request.base_image.clone())
            .await?;
        Ok(self.wrap(&request.prompt, bytes))
    }

    async fn generate_frame(
        &self,
        request: &FrameRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        // Single-image endpoint: prefer the pose image as init when present,
        // since it already embodies the base character.
        let init = request
            .pose_image
            .clone()
            .unwrap_or_else(|| request.base_image.clone());
        let bytes = self.generate(&request.prompt, init).await?;
        Ok(self.wrap(&request.prompt, bytes))
    }

    async fn generate_continuation(
        &self,
        request: &ContinuationRequest,
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        // No batch support upstream; N sequential calls satisfy the
        // N-independent-results contract. Seed from the most recent prior
        // frame when one exists so variants continue the scene.
        let init = request
            .previous_frames
            .first()
            .cloned()
            .unwrap_or_else(|| request.frame.base_image.clone());

        let mut images = Vec::with_capacity(request.variants);
        for i in 0..request.variants {
            let prompt = format!("{} (take {})", request.frame.prompt, i + 1);
            let bytes = self.generate(&prompt, init.clone()).await?;
            images.push(self.wrap(&prompt, bytes));
        }
        Ok(images)
    }
}
