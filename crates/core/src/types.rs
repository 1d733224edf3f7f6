//! Shared type aliases used across the workspace.

/// UTC timestamp type used for all entity timestamps.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Arbitrary JSON metadata attached to generated records.
pub type Metadata = serde_json::Value;
