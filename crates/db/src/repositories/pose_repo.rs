//! Repository for the `poses` table.
//!
//! Pose rows are insert-only: a batch is persisted with its scores and
//! approval flags already computed, and no column is ever updated.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::pose::{CreatePose, Pose};

/// Column list for `poses` queries.
const POSE_COLUMNS: &str = "\
    id, owner_id, character_id, pose_label, pose_description, \
    scene_use_case, generated_image_path, score, approved_for_scene, \
    provider, prompt, metadata, created_at";

pub struct PoseRepo;

impl PoseRepo {
    /// Insert one pose candidate.
    pub async fn create(pool: &PgPool, input: &CreatePose) -> Result<Pose, sqlx::Error> {
        let query = format!(
            "INSERT INTO poses (\
                id, owner_id, character_id, pose_label, pose_description, \
                scene_use_case, generated_image_path, score, approved_for_scene, \
                provider, prompt, metadata\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {POSE_COLUMNS}"
        );
        sqlx::query_as::<_, Pose>(&query)
            .bind(input.id)
            .bind(input.owner_id)
            .bind(input.character_id)
            .bind(&input.pose_label)
            .bind(&input.pose_description)
            .bind(input.scene_use_case.as_deref())
            .bind(&input.generated_image_path)
            .bind(input.score)
            .bind(input.approved_for_scene)
            .bind(&input.provider)
            .bind(&input.prompt)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find a pose by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Pose>, sqlx::Error> {
        let query = format!("SELECT {POSE_COLUMNS} FROM poses WHERE id = $1");
        sqlx::query_as::<_, Pose>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
