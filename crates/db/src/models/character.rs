use serde::Serialize;
use sqlx::FromRow;
use storyloom_core::types::Timestamp;
use uuid::Uuid;

/// A row from the `characters` table.
///
/// Characters are created by an external collaborator; this service only
/// reads them for ownership checks and flips `has_pose_library` after the
/// first pose batch.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub project_id: Option<Uuid>,
    pub name: String,
    pub base_image_path: Option<String>,
    pub has_pose_library: bool,
    pub created_at: Timestamp,
}
