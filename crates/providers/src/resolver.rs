//! Provider resolution.
//!
//! Pure precedence over the explicit [`ProviderConfig`]: request override →
//! configured default → first provider with credentials → placeholder.
//! Callers receive a trait object and never branch on provider identity.

use std::sync::Arc;

use storyloom_core::error::CoreError;

use crate::config::ProviderConfig;
use crate::openai::OpenAiProvider;
use crate::placeholder::PlaceholderProvider;
use crate::stability::StabilityProvider;
use crate::types::ImageProvider;
use crate::{openai, placeholder, stability};

/// Names of all known providers, in credential-fallback order.
pub const KNOWN_PROVIDERS: &[&str] = &[
    openai::PROVIDER_NAME,
    stability::PROVIDER_NAME,
    placeholder::PROVIDER_NAME,
];

/// Resolve the provider for one request.
///
/// An override naming an unknown provider, or one whose credentials are not
/// configured, is a validation error: the caller asked for something this
/// deployment cannot honor. An unusable *default* silently falls through to
/// the credential scan so a stale config entry does not take the service
/// down.
pub fn resolve_provider(
    config: &ProviderConfig,
    override_name: Option<&str>,
) -> Result<Arc<dyn ImageProvider>, CoreError> {
    if let Some(name) = override_name {
        return build_named(config, name).ok_or_else(|| {
            CoreError::Validation(format!(
                "Provider '{name}' is unknown or has no credentials configured. \
                 Known providers: {KNOWN_PROVIDERS:?}"
            ))
        });
    }

    if let Some(default) = config.default_provider.as_deref() {
        if let Some(provider) = build_named(config, default) {
            return Ok(provider);
        }
        tracing::warn!(
            provider = default,
            "Configured default provider is unusable, falling back to credential scan"
        );
    }

    if let Some(key) = &config.openai_api_key {
        return Ok(Arc::new(OpenAiProvider::new(key.clone())));
    }
    if let Some(key) = &config.stability_api_key {
        return Ok(Arc::new(StabilityProvider::new(key.clone())));
    }

    Ok(Arc::new(PlaceholderProvider))
}

/// Build a provider by name, or `None` when the name is unknown or its
/// credentials are absent.
fn build_named(config: &ProviderConfig, name: &str) -> Option<Arc<dyn ImageProvider>> {
    match name {
        openai::PROVIDER_NAME => config
            .openai_api_key
            .as_ref()
            .map(|key| Arc::new(OpenAiProvider::new(key.clone())) as Arc<dyn ImageProvider>),
        stability::PROVIDER_NAME => config
            .stability_api_key
            .as_ref()
            .map(|key| Arc::new(StabilityProvider::new(key.clone())) as Arc<dyn ImageProvider>),
        placeholder::PROVIDER_NAME => Some(Arc::new(PlaceholderProvider)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
