//! Pose candidate models. Poses are written in batches and are immutable
//! afterward; `approved_for_scene` is fixed at batch-creation time from
//! within-batch ranking.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::types::{Metadata, Timestamp};
use uuid::Uuid;

/// A row from the `poses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Pose {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub character_id: Uuid,
    pub pose_label: String,
    pub pose_description: String,
    pub scene_use_case: Option<String>,
    pub generated_image_path: String,
    pub score: f64,
    pub approved_for_scene: bool,
    pub provider: String,
    pub prompt: String,
    pub metadata: Metadata,
    pub created_at: Timestamp,
}

/// Insert payload for one pose candidate within a batch.
#[derive(Debug)]
pub struct CreatePose {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub character_id: Uuid,
    pub pose_label: String,
    pub pose_description: String,
    pub scene_use_case: Option<String>,
    pub generated_image_path: String,
    pub score: f64,
    pub approved_for_scene: bool,
    pub provider: String,
    pub prompt: String,
    pub metadata: Metadata,
}

/// One requested pose within `POST /pose-generation`.
#[derive(Debug, Deserialize)]
pub struct PoseSpec {
    pub label: String,
    pub description: String,
    pub long_description: Option<String>,
    pub scene_use_case: Option<String>,
}

/// Request body for `POST /pose-generation`.
#[derive(Debug, Deserialize)]
pub struct GeneratePosesRequest {
    pub character_id: Uuid,
    pub poses: Vec<PoseSpec>,
    /// How many candidates to mark approved; clamped to [1, 5], default 3.
    pub keep_top: Option<usize>,
    /// Optional provider override for this request.
    pub provider: Option<String>,
}

/// One pose candidate in the `POST /pose-generation` response.
#[derive(Debug, Serialize)]
pub struct PoseCandidateResponse {
    pub id: Uuid,
    pub pose_label: String,
    pub pose_description: String,
    pub score: f64,
    pub approved_for_scene: bool,
    pub generated_image_url: String,
    pub signed_url: Option<String>,
}

/// Response body for `POST /pose-generation`.
#[derive(Debug, Serialize)]
pub struct GeneratePosesResponse {
    pub character_id: Uuid,
    pub provider: String,
    pub poses: Vec<PoseCandidateResponse>,
}
