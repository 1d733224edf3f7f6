//! Request and response types for the provider capability interface.

use async_trait::async_trait;
use serde::Serialize;
use storyloom_core::prompt::ReferenceDescriptor;

use crate::error::ProviderError;

/// Default number of variants requested by a continuation call.
pub const DEFAULT_VARIANT_COUNT: usize = 5;

/// Inputs for generating one pose candidate from a character base image.
#[derive(Debug, Clone)]
pub struct PoseRequest {
    /// The character's base image bytes (PNG).
    pub base_image: Vec<u8>,
    /// The single composed natural-language prompt.
    pub prompt: String,
    /// Reference descriptors; enrich the prompt only, never control flow.
    pub references: Vec<ReferenceDescriptor>,
}

/// Inputs for generating one storyboard frame.
#[derive(Debug, Clone)]
pub struct FrameRequest {
    pub base_image: Vec<u8>,
    /// Optional approved-pose image bytes.
    pub pose_image: Option<Vec<u8>>,
    pub prompt: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub references: Vec<ReferenceDescriptor>,
}

/// Inputs for a multi-variant scene continuation.
#[derive(Debug, Clone)]
pub struct ContinuationRequest {
    pub frame: FrameRequest,
    /// Up to two most recent prior frames, newest first, as continuity
    /// references.
    pub previous_frames: Vec<Vec<u8>>,
    /// Number of independent variants to produce.
    pub variants: usize,
}

/// Metadata describing how an image was produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    /// Provider name (e.g. `gpt-image`, `stability`, `placeholder`).
    pub provider: String,
    /// Upstream model identifier, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// The prompt actually sent upstream.
    pub prompt: String,
    /// True when this image is a degradation placeholder, not a real
    /// generation.
    pub fallback: bool,
    /// The upstream error that triggered the fallback, preserved verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw provider response fragments useful for debugging.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub raw: serde_json::Value,
}

impl ProviderMetadata {
    /// Metadata for a successful upstream generation.
    pub fn generated(provider: &str, model: Option<&str>, prompt: &str) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.map(str::to_string),
            prompt: prompt.to_string(),
            fallback: false,
            error: None,
            raw: serde_json::Value::Null,
        }
    }
}

/// One generated image plus its provenance metadata.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub metadata: ProviderMetadata,
}

/// The uniform capability interface every concrete provider implements.
///
/// Adapter methods are fallible; callers that need the never-throws
/// contract go through [`crate::Generator`], which maps every error to a
/// placeholder result at this boundary.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Stable provider name used in records and request overrides.
    fn name(&self) -> &'static str;

    /// Generate one pose candidate from a character base image.
    async fn generate_pose(&self, request: &PoseRequest)
        -> Result<GeneratedImage, ProviderError>;

    /// Generate one storyboard frame.
    async fn generate_frame(
        &self,
        request: &FrameRequest,
    ) -> Result<GeneratedImage, ProviderError>;

    /// Generate `request.variants` continuation candidates.
    ///
    /// The contract guarantees that many independent results, not the call
    /// count used to produce them; adapters without batch support issue
    /// sequential calls.
    async fn generate_continuation(
        &self,
        request: &ContinuationRequest,
    ) -> Result<Vec<GeneratedImage>, ProviderError>;
}

impl std::fmt::Debug for dyn ImageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageProvider")
            .field("name", &self.name())
            .finish()
    }
}
