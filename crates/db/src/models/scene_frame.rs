//! Scene frame models. Frames are append-only: a new generation always
//! inserts new rows, so history and variant groups stay intact.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::types::{Metadata, Timestamp};
use uuid::Uuid;

/// A row from the `scene_frames` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SceneFrame {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub scene_id: Uuid,
    pub frame_index: i32,
    pub character_id: Option<Uuid>,
    pub pose_id: Option<Uuid>,
    pub input_refs: Metadata,
    pub prompt: String,
    pub output_image_path: String,
    pub variant_group_id: Option<Uuid>,
    pub variant_index: Option<i32>,
    pub selected: bool,
    pub metadata: Metadata,
    pub created_at: Timestamp,
}

/// Insert payload for one scene frame.
#[derive(Debug)]
pub struct CreateSceneFrame {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub scene_id: Uuid,
    pub frame_index: i32,
    pub character_id: Option<Uuid>,
    pub pose_id: Option<Uuid>,
    pub input_refs: Metadata,
    pub prompt: String,
    pub output_image_path: String,
    pub variant_group_id: Option<Uuid>,
    pub variant_index: Option<i32>,
    pub selected: bool,
    pub metadata: Metadata,
}

/// Request body for `POST /scene-generation`.
#[derive(Debug, Deserialize)]
pub struct GenerateFrameRequest {
    pub scene_id: Uuid,
    pub character_id: Uuid,
    pub pose_id: Option<Uuid>,
    pub prompt: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub provider: Option<String>,
}

/// Request body for `POST /scene-continuation`.
#[derive(Debug, Deserialize)]
pub struct ContinueSceneRequest {
    pub scene_id: Uuid,
    pub character_id: Uuid,
    pub pose_id: Option<Uuid>,
    pub prompt: String,
    pub frame_index: Option<i32>,
    pub provider: Option<String>,
}

/// One frame in a generation response.
#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub id: Uuid,
    pub frame_index: i32,
    pub output_image_url: String,
    pub signed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_index: Option<i32>,
    pub selected: bool,
}

/// Response body for `POST /scene-generation`.
#[derive(Debug, Serialize)]
pub struct GenerateFrameResponse {
    pub scene_id: Uuid,
    pub provider: String,
    pub job_id: Uuid,
    pub frame: FrameResponse,
}

/// Response body for `POST /scene-continuation`.
#[derive(Debug, Serialize)]
pub struct ContinueSceneResponse {
    pub scene_id: Uuid,
    pub provider: String,
    pub variant_group_id: Uuid,
    pub frames: Vec<FrameResponse>,
}

/// Per-variant `(variant_index, selected)` assignments for one continuation
/// group. Exactly one entry is selected, by convention the first.
pub fn variant_assignments(count: usize) -> Vec<(i32, bool)> {
    (0..count).map(|i| (i as i32, i == 0)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
