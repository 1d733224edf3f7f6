//! Deterministic placeholder imagery and the always-available provider.
//!
//! The placeholder PNG is a pure function of the prompt: the SHA-256 digest
//! picks a flat fill color, so retries and tests see identical bytes for
//! identical prompts.

use async_trait::async_trait;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use sha2::{Digest, Sha256};

use crate::error::ProviderError;
use crate::types::{
    ContinuationRequest, FrameRequest, GeneratedImage, ImageProvider, PoseRequest,
    ProviderMetadata,
};

/// Provider name used in records and overrides.
pub const PROVIDER_NAME: &str = "placeholder";

/// Side length of placeholder images.
const PLACEHOLDER_SIZE: u32 = 512;

/// Render the deterministic placeholder PNG for a prompt.
pub fn placeholder_png(prompt: &str) -> Vec<u8> {
    let digest = Sha256::digest(prompt.as_bytes());
    let color = Rgb([digest[0], digest[1], digest[2]]);

    let img = RgbImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, color);

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            img.as_raw(),
            PLACEHOLDER_SIZE,
            PLACEHOLDER_SIZE,
            ExtendedColorType::Rgb8,
        )
        .expect("encoding an in-memory PNG cannot fail");
    bytes
}

/// Build the degradation result for a failed upstream call: placeholder
/// bytes plus metadata naming the provider and preserving its error.
pub fn fallback_image(provider: &str, prompt: &str, error: &str) -> GeneratedImage {
    GeneratedImage {
        bytes: placeholder_png(prompt),
        metadata: ProviderMetadata {
            provider: provider.to_string(),
            model: None,
            prompt: prompt.to_string(),
            fallback: true,
            error: Some(error.to_string()),
            raw: serde_json::Value::Null,
        },
    }
}

/// The provider of last resort: no credentials, no network, never fails.
#[derive(Debug, Default)]
pub struct PlaceholderProvider;

impl PlaceholderProvider {
    fn render(&self, prompt: &str) -> GeneratedImage {
        GeneratedImage {
            bytes: placeholder_png(prompt),
            metadata: ProviderMetadata::generated(PROVIDER_NAME, None, prompt),
        }
    }
}

#[async_trait]
impl ImageProvider for PlaceholderProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate_pose(
        &self,
        request: &PoseRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        Ok(self.render(&request.prompt))
    }

    async fn generate_frame(
        &self,
        request: &FrameRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        Ok(self.render(&request.prompt))
    }

    async fn generate_continuation(
        &self,
        request: &ContinuationRequest,
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        // Vary the prompt per variant so the variants are distinguishable.
        Ok((0..request.variants)
            .map(|i| self.render(&format!("{} [variant {i}]", request.frame.prompt)))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
