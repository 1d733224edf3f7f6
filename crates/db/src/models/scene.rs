use serde::Serialize;
use sqlx::FromRow;
use storyloom_core::types::Timestamp;
use uuid::Uuid;

/// A row from the `scenes` table. Created externally; read here for
/// ownership validation and asset scoping.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub project_id: Option<Uuid>,
    pub title: String,
    pub created_at: Timestamp,
}
