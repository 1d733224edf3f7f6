//! Repository for the `scene_frames` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::scene_frame::{CreateSceneFrame, SceneFrame};

/// Column list for `scene_frames` queries.
const FRAME_COLUMNS: &str = "\
    id, owner_id, scene_id, frame_index, character_id, pose_id, \
    input_refs, prompt, output_image_path, variant_group_id, \
    variant_index, selected, metadata, created_at";

pub struct SceneFrameRepo;

impl SceneFrameRepo {
    /// Insert one scene frame.
    pub async fn create(pool: &PgPool, input: &CreateSceneFrame) -> Result<SceneFrame, sqlx::Error> {
        let query = format!(
            "INSERT INTO scene_frames (\
                id, owner_id, scene_id, frame_index, character_id, pose_id, \
                input_refs, prompt, output_image_path, variant_group_id, \
                variant_index, selected, metadata\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {FRAME_COLUMNS}"
        );
        sqlx::query_as::<_, SceneFrame>(&query)
            .bind(input.id)
            .bind(input.owner_id)
            .bind(input.scene_id)
            .bind(input.frame_index)
            .bind(input.character_id)
            .bind(input.pose_id)
            .bind(&input.input_refs)
            .bind(&input.prompt)
            .bind(&input.output_image_path)
            .bind(input.variant_group_id)
            .bind(input.variant_index)
            .bind(input.selected)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Most recent frames for a scene by descending frame index, used as
    /// continuity references. `limit` is typically 2.
    pub async fn recent_for_scene(
        pool: &PgPool,
        scene_id: Uuid,
        limit: i64,
    ) -> Result<Vec<SceneFrame>, sqlx::Error> {
        let query = format!(
            "SELECT {FRAME_COLUMNS} FROM scene_frames \
             WHERE scene_id = $1 \
             ORDER BY frame_index DESC, created_at DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, SceneFrame>(&query)
            .bind(scene_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Highest frame index currently recorded for a scene, if any.
    pub async fn max_frame_index(
        pool: &PgPool,
        scene_id: Uuid,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: (Option<i32>,) =
            sqlx::query_as("SELECT MAX(frame_index) FROM scene_frames WHERE scene_id = $1")
                .bind(scene_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
