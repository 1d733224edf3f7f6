//! OpenAI Images adapter (`gpt-image` provider).
//!
//! Uses the image edits endpoint so the character base image (and optional
//! pose/previous-frame images) steer the generation. Responses carry
//! base64-encoded PNG payloads.

use base64::Engine;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::types::{
    ContinuationRequest, FrameRequest, GeneratedImage, ImageProvider, PoseRequest,
    ProviderMetadata,
};

/// Provider name used in records and overrides.
pub const PROVIDER_NAME: &str = "gpt-image";

/// Upstream model identifier.
const MODEL: &str = "gpt-image-1";

const EDITS_URL: &str = "https://api.openai.com/v1/images/edits";

/// Response body of the images endpoint.
#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
}

/// Adapter for the OpenAI Images API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    /// Issue one edits call with the given input images and variant count,
    /// returning the decoded PNG payloads.
    async fn edit(
        &self,
        prompt: &str,
        images: Vec<(&'static str, Vec<u8>)>,
        n: usize,
    ) -> Result<Vec<Vec<u8>>, ProviderError> {
        let mut form = Form::new()
            .text("model", MODEL)
            .text("prompt", prompt.to_string())
            .text("n", n.to_string());

        for (name, bytes) in images {
            let part = Part::bytes(bytes)
                .file_name(format!("{name}.png"))
                .mime_str("image/png")
                .map_err(|e| ProviderError::Decode(format!("Invalid mime type: {e}")))?;
            form = form.part("image[]", part);
        }

        let response = self
            .client
            .post(EDITS_URL)
            .bearer_auth(&self.api_key)
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

        let parsed: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(format!("Invalid images response: {e}")))?;

        parsed
            .data
            .into_iter()
            .map(|datum| {
                let b64 = datum
                    .b64_json
                    .ok_or_else(|| ProviderError::Decode("Response datum missing b64_json".into()))?;
                base64::engine::general_purpose::STANDARD
                    .decode(b64)
                    .map_err(|e| ProviderError::Decode(format!("Invalid base64 payload: {e}")))
            })
            .collect()
    }

    fn single(
        &self,
        prompt: &str,
        mut decoded: Vec<Vec<u8>>,
    ) -> Result<GeneratedImage, ProviderError> {
        let bytes = decoded
            .pop()
            .ok_or_else(|| ProviderError::Decode("Response contained no images".into()))?;
        Ok(GeneratedImage {
            bytes,
            metadata: ProviderMetadata::generated(PROVIDER_NAME, Some(MODEL), prompt),
        })
    }
}

#[async_trait::async_trait]
impl ImageProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn generate_pose(
        &self,
        request: &PoseRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        let decoded = self
            .edit(&request.prompt, vec![("base", request.base_image.clone())], 1)
            .await?;
        self.single(&request.prompt, decoded)
    }

    async fn generate_frame(
        &self,
        request: &FrameRequest,
    ) -> Result<GeneratedImage, ProviderError> {
        let mut images = vec![("base", request.base_image.clone())];
        if let Some(pose) = &request.pose_image {
            images.push(("pose", pose.clone()));
        }
        let decoded = self.edit(&request.prompt, images, 1).await?;
        self.single(&request.prompt, decoded)
    }

    async fn generate_continuation(
        &self,
        request: &ContinuationRequest,
    ) -> Result<Vec<GeneratedImage>, ProviderError> {
        let mut images = vec![("base", request.frame.base_image.clone())];
        if let Some(pose) = &request.frame.pose_image {
            images.push(("pose", pose.clone()));
        }
        for previous in &request.previous_frames {
            images.push(("previous", previous.clone()));
        }

        // One logical call: the edits endpoint supports batched variants
        // via `n`.
        let decoded = self
            .edit(&request.frame.prompt, images, request.variants)
            .await?;

        Ok(decoded
            .into_iter()
            .map(|bytes| GeneratedImage {
                bytes,
                metadata: ProviderMetadata::generated(PROVIDER_NAME, Some(MODEL), &request.frame.prompt),
            })
            .collect())
    }
}
