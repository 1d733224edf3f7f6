//! S3-compatible object storage for generated and uploaded imagery.
//!
//! [`ObjectStore`] wraps the AWS S3 SDK for the three operations the
//! pipeline needs: download reference bytes, upload generated bytes, and
//! issue presigned read URLs. Bucket and key selection happen upstream in
//! `storyloom_core::addressing`; this crate only moves bytes.

use std::time::Duration;

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use storyloom_core::addressing::ObjectPointer;

/// Default lifetime for presigned read URLs (one hour).
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{path}")]
    NotFound { bucket: String, path: String },

    #[error("Storage request failed: {0}")]
    Request(String),
}

/// Connection settings for the object store.
///
/// Built once at startup and passed in explicitly; no ambient globals.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Custom endpoint for S3-compatible stores (MinIO, localstack).
    /// `None` uses the AWS default resolution.
    pub endpoint_url: Option<String>,
    /// Presigned URL lifetime in seconds.
    pub signed_url_ttl_secs: u64,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `STORAGE_ENDPOINT_URL`| unset   |
    /// | `SIGNED_URL_TTL_SECS` | `3600`  |
    pub fn from_env() -> Self {
        let endpoint_url = std::env::var("STORAGE_ENDPOINT_URL").ok();
        let signed_url_ttl_secs: u64 = std::env::var("SIGNED_URL_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_SIGNED_URL_TTL_SECS.to_string())
            .parse()
            .expect("SIGNED_URL_TTL_SECS must be a valid u64");
        Self {
            endpoint_url,
            signed_url_ttl_secs,
        }
    }
}

/// Async client for the image buckets.
#[derive(Clone)]
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    signed_url_ttl: Duration,
}

impl ObjectStore {
    /// Build a store from the AWS default credential/region chain plus the
    /// explicit [`StorageConfig`].
    pub async fn connect(config: &StorageConfig) -> Self {
        let base = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&base)
            // Path-style addressing works for both AWS and MinIO-style
            // endpoints with bucket names containing no dots.
            .force_path_style(true);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            signed_url_ttl: Duration::from_secs(config.signed_url_ttl_secs),
        }
    }

    /// Build a store around an existing client (tests, custom wiring).
    pub fn with_client(client: aws_sdk_s3::Client, signed_url_ttl_secs: u64) -> Self {
        Self {
            client,
            signed_url_ttl: Duration::from_secs(signed_url_ttl_secs),
        }
    }

    /// Download an object's bytes.
    pub async fn download(&self, pointer: &ObjectPointer) -> Result<Vec<u8>, StorageError> {
        let output = self
            .client
            .get_object()
            .bucket(&pointer.bucket)
            .key(&pointer.path)
            .send()
            .await
            .map_err(|e| classify_get_error(pointer, e))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Request(format!("Failed to read object body: {e}")))?;
        Ok(bytes.into_bytes().to_vec())
    }

    /// Upload PNG bytes to the given pointer. Overwrites any existing
    /// object at the same key (addressing is deterministic, so a rewrite of
    /// the same artifact is an upsert).
    pub async fn upload(&self, pointer: &ObjectPointer, bytes: Vec<u8>) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&pointer.bucket)
            .key(&pointer.path)
            .content_type("image/png")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("Failed to upload object: {e}")))?;
        Ok(())
    }

    /// Issue a presigned read URL for a pointer.
    ///
    /// Signing failure is non-fatal: the durable pointer is still usable
    /// later, so this returns `None` and logs at warn instead of erroring.
    pub async fn signed_url(&self, pointer: &ObjectPointer) -> Option<String> {
        let presigning = match PresigningConfig::expires_in(self.signed_url_ttl) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid presigning configuration");
                return None;
            }
        };

        match self
            .client
            .get_object()
            .bucket(&pointer.bucket)
            .key(&pointer.path)
            .presigned(presigning)
            .await
        {
            Ok(request) => Some(request.uri().to_string()),
            Err(e) => {
                tracing::warn!(
                    bucket = %pointer.bucket,
                    path = %pointer.path,
                    error = %e,
                    "Failed to presign object URL"
                );
                None
            }
        }
    }
}

fn classify_get_error(
    pointer: &ObjectPointer,
    err: aws_sdk_s3::error::SdkError<aws_sdk_s3::operation::get_object::GetObjectError>,
) -> StorageError {
    if let aws_sdk_s3::error::SdkError::ServiceError(service_err) = &err {
        if service_err.err().is_no_such_key() {
            return StorageError::NotFound {
                bucket: pointer.bucket.clone(),
                path: pointer.path.clone(),
            };
        }
    }
    StorageError::Request(format!("Failed to download object: {err}"))
}
