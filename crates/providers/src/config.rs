//! Provider credentials and selection defaults.
//!
//! Built once at startup and passed into the resolver and handlers; no
//! module-level singletons read the environment at call time.

use crate::types::DEFAULT_VARIANT_COUNT;

/// Credentials and defaults for provider resolution.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// Configured default provider name, if any.
    pub default_provider: Option<String>,
    /// OpenAI API key (`gpt-image` adapter).
    pub openai_api_key: Option<String>,
    /// Stability AI API key (`stability` adapter).
    pub stability_api_key: Option<String>,
    /// Variants per continuation call.
    pub variant_count: usize,
}

impl ProviderConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `GENERATION_PROVIDER`   | unset   |
    /// | `OPENAI_API_KEY`        | unset   |
    /// | `STABILITY_API_KEY`     | unset   |
    /// | `CONTINUATION_VARIANTS` | `5`     |
    pub fn from_env() -> Self {
        let variant_count: usize = std::env::var("CONTINUATION_VARIANTS")
            .unwrap_or_else(|_| DEFAULT_VARIANT_COUNT.to_string())
            .parse()
            .expect("CONTINUATION_VARIANTS must be a valid usize");

        Self {
            default_provider: std::env::var("GENERATION_PROVIDER").ok().filter(|s| !s.is_empty()),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
            stability_api_key: std::env::var("STABILITY_API_KEY").ok().filter(|s| !s.is_empty()),
            variant_count,
        }
    }

    /// Variant count with a sane floor; a misconfigured zero would make
    /// continuation responses empty.
    pub fn variants(&self) -> usize {
        if self.variant_count == 0 {
            DEFAULT_VARIANT_COUNT
        } else {
            self.variant_count
        }
    }
}
