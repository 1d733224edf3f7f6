//! Repository for the `scenes` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::scene::Scene;

/// Column list for `scenes` queries.
const SCENE_COLUMNS: &str = "id, owner_id, project_id, title, created_at";

/// Read access to scenes (creation happens in an external collaborator).
pub struct SceneRepo;

impl SceneRepo {
    /// Find a scene by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {SCENE_COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
