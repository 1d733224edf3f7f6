/// Errors from provider adapters.
///
/// These never escape the [`crate::Generator`] facade on the pose and
/// continuation paths; the single-frame job path records the message on the
/// failed job verbatim.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider responded 2xx but the payload could not be decoded.
    #[error("Malformed provider response: {0}")]
    Decode(String),
}
