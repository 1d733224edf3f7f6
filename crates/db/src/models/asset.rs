use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::types::{Metadata, Timestamp};
use uuid::Uuid;

/// A row from the `assets` table. One row per uploaded or generated image,
/// queried per-scene to build history and galleries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub scene_id: Uuid,
    pub kind: String,
    pub storage_path: String,
    pub metadata: Metadata,
    pub created_at: Timestamp,
}

/// Insert payload for an asset row.
#[derive(Debug)]
pub struct CreateAsset {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub scene_id: Uuid,
    pub kind: String,
    pub storage_path: String,
    pub metadata: Metadata,
}

/// Request body for the collaborator asset-insert path
/// (`POST /scenes/{id}/assets`): registers an already-uploaded pointer.
#[derive(Debug, Deserialize)]
pub struct RegisterAssetRequest {
    /// Asset kind: `reference` or `mask` (renders are created internally).
    pub kind: String,
    pub storage_path: String,
    pub metadata: Option<Metadata>,
}

/// One asset in a listing response, with a freshly signed read URL.
#[derive(Debug, Serialize)]
pub struct AssetWithUrl {
    #[serde(flatten)]
    pub asset: Asset,
    pub signed_url: Option<String>,
}
