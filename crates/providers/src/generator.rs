//! The degradation boundary around a resolved provider.
//!
//! [`Generator`] enforces the pipeline contract: pose and continuation
//! calls never fail -- any adapter error is logged and mapped to a
//! deterministic placeholder plus explanatory metadata. The single-frame
//! job path uses the fallible [`Generator::frame`] passthrough instead so
//! the failure can be recorded on the job row.

use std::sync::Arc;

use crate::placeholder::fallback_image;
use crate::types::{
    ContinuationRequest, FrameRequest, GeneratedImage, ImageProvider, PoseRequest,
};
use crate::ProviderError;

/// A resolved provider plus the never-throws degradation policy.
#[derive(Clone)]
pub struct Generator {
    provider: Arc<dyn ImageProvider>,
}

impl Generator {
    pub fn new(provider: Arc<dyn ImageProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Generate one pose candidate. Never fails: an upstream error yields a
    /// placeholder image with the error preserved in metadata.
    pub async fn pose(&self, request: &PoseRequest) -> GeneratedImage {
        match self.provider.generate_pose(request).await {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Pose generation failed, substituting placeholder"
                );
                fallback_image(self.provider.name(), &request.prompt, &e.to_string())
            }
        }
    }

    /// Generate one storyboard frame. Fallible on purpose: the async
    /// single-frame path surfaces provider failures as terminal job state
    /// rather than absorbing them.
    pub async fn frame(&self, request: &FrameRequest) -> Result<GeneratedImage, ProviderError> {
        self.provider.generate_frame(request).await
    }

    /// Generate exactly `request.variants` continuation candidates.
    ///
    /// Never fails. A failed batch becomes all placeholders; a short batch
    /// is padded with placeholders; an overlong one is truncated. Callers
    /// can rely on the result length unconditionally.
    pub async fn continuation(&self, request: &ContinuationRequest) -> Vec<GeneratedImage> {
        let mut images = match self.provider.generate_continuation(request).await {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    variants = request.variants,
                    "Continuation generation failed, substituting placeholders"
                );
                let reason = e.to_string();
                return (0..request.variants)
                    .map(|i| {
                        fallback_image(
                            self.provider.name(),
                            &format!("{} [variant {i}]", request.frame.prompt),
                            &reason,
                        )
                    })
                    .collect();
            }
        };

        if images.len() > request.variants {
            images.truncate(request.variants);
        }
        while images.len() < request.variants {
            let i = images.len();
            images.push(fallback_image(
                self.provider.name(),
                &format!("{} [variant {i}]", request.frame.prompt),
                "provider returned fewer variants than requested",
            ));
        }
        images
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderMetadata;
    use async_trait::async_trait;

    /// A provider that fails every call, for degradation tests.
    struct FailingProvider;

    #[async_trait]
    impl ImageProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate_pose(
            &self,
            _request: &PoseRequest,
        ) -> Result<GeneratedImage, ProviderError> {
            Err(ProviderError::Api {
                status: 429,
                body: "quota exceeded".into(),
            })
        }

        async fn generate_frame(
            &self,
            _request: &FrameRequest,
        ) -> Result<GeneratedImage, ProviderError> {
            Err(ProviderError::Api {
                status: 500,
                body: "boom".into(),
            })
        }

        async fn generate_continuation(
            &self,
            _request: &ContinuationRequest,
        ) -> Result<Vec<GeneratedImage>, ProviderError> {
            Err(ProviderError::Decode("garbage payload".into()))
        }
    }

    /// A provider whose continuation batch comes up short.
    struct ShortBatchProvider;

    #[async_trait]
    impl ImageProvider for ShortBatchProvider {
        fn name(&self) -> &'static str {
            "short"
        }

        async fn generate_pose(
            &self,
            request: &PoseRequest,
        ) -> Result<GeneratedImage, ProviderError> {
            Ok(GeneratedImage {
                bytes: vec![1, 2, 3],
                metadata: ProviderMetadata::generated("short", None, &request.prompt),
            })
        }

        async fn generate_frame(
            &self,
            request: &FrameRequest,
        ) -> Result<GeneratedImage, ProviderError> {
            Ok(GeneratedImage {
                bytes: vec![1, 2, 3],
                metadata: ProviderMetadata::generated("short", None, &request.prompt),
            })
        }

        async fn generate_continuation(
            &self,
            request: &ContinuationRequest,
        ) -> Result<Vec<GeneratedImage>, ProviderError> {
            Ok(vec![GeneratedImage {
                bytes: vec![9],
                metadata: ProviderMetadata::generated("short", None, &request.frame.prompt),
            }])
        }
    }

    fn pose_request() -> PoseRequest {
        PoseRequest {
            base_image: Vec::new(),
            prompt: "Run: sprinting forward".into(),
            references: Vec::new(),
        }
    }

    fn continuation_request(variants: usize) -> ContinuationRequest {
        ContinuationRequest {
            frame: FrameRequest {
                base_image: Vec::new(),
                pose_image: None,
                prompt: "she runs on".into(),
                width: None,
                height: None,
                references: Vec::new(),
            },
            previous_frames: Vec::new(),
            variants,
        }
    }

    #[tokio::test]
    async fn pose_failure_degrades_to_placeholder() {
        let generator = Generator::new(Arc::new(FailingProvider));
        let image = generator.pose(&pose_request()).await;

        assert!(image.metadata.fallback);
        assert!(image.metadata.error.as_deref().unwrap().contains("quota exceeded"));
        assert!(!image.bytes.is_empty());
    }

    #[tokio::test]
    async fn frame_failure_propagates_for_the_job_path() {
        let generator = Generator::new(Arc::new(FailingProvider));
        let request = continuation_request(1).frame;
        let err = generator.frame(&request).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn continuation_failure_yields_exactly_n_placeholders() {
        let generator = Generator::new(Arc::new(FailingProvider));
        let images = generator.continuation(&continuation_request(5)).await;

        assert_eq!(images.len(), 5);
        assert!(images.iter().all(|i| i.metadata.fallback));
    }

    #[tokio::test]
    async fn short_batches_are_padded_to_n() {
        let generator = Generator::new(Arc::new(ShortBatchProvider));
        let images = generator.continuation(&continuation_request(4)).await;

        assert_eq!(images.len(), 4);
        assert!(!images[0].metadata.fallback);
        assert!(images[1].metadata.fallback);
        assert!(images[3].metadata.fallback);
    }
}
