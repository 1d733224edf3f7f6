//! Repository for the `characters` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::character::Character;

/// Column list for `characters` queries.
const CHARACTER_COLUMNS: &str = "\
    id, owner_id, project_id, name, base_image_path, \
    has_pose_library, created_at";

/// Read access plus the single mutation this service performs on characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Find a character by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {CHARACTER_COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Flip `has_pose_library` to true after the first pose batch.
    ///
    /// Idempotent: re-flipping an already-flagged character is a no-op.
    pub async fn mark_pose_library(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE characters SET has_pose_library = TRUE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
