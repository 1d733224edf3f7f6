//! Provider abstraction for external image-generation services.
//!
//! Every concrete provider implements the same three capabilities: pose
//! from character, scene frame from character, and multi-variant scene
//! continuation. Adapters are fallible; the [`Generator`] facade is the
//! degradation boundary that converts any adapter failure into a
//! deterministic placeholder image plus explanatory metadata, so a provider
//! outage never aborts a user-visible request.

pub mod config;
pub mod error;
pub mod generator;
pub mod openai;
pub mod placeholder;
pub mod resolver;
pub mod stability;
pub mod types;

pub use config::ProviderConfig;
pub use error::ProviderError;
pub use generator::Generator;
pub use resolver::resolve_provider;
pub use types::{
    ContinuationRequest, FrameRequest, GeneratedImage, ImageProvider, PoseRequest,
    ProviderMetadata,
};
