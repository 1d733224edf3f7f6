//! Repository for the `generation_jobs` table.
//!
//! The terminal updates are guarded with `WHERE status = 'processing'` so a
//! job transitions out of `processing` at most once even if two writers
//! race; the loser's update affects zero rows.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::generation_job::{CreateGenerationJob, GenerationJob, JobStatus};

/// Column list for `generation_jobs` queries.
const JOB_COLUMNS: &str = "\
    id, owner_id, scene_id, provider, prompt, negative_prompt, \
    width, height, steps, guidance, seed, status, asset_id, error, \
    metadata, created_at, updated_at";

pub struct GenerationJobRepo;

impl GenerationJobRepo {
    /// Insert a new job in the `processing` state.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGenerationJob,
    ) -> Result<GenerationJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_jobs (\
                id, owner_id, scene_id, provider, prompt, negative_prompt, \
                width, height, steps, guidance, seed, status, metadata\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {JOB_COLUMNS}"
        );
        sqlx::query_as::<_, GenerationJob>(&query)
            .bind(input.id)
            .bind(input.owner_id)
            .bind(input.scene_id)
            .bind(&input.provider)
            .bind(&input.prompt)
            .bind(input.negative_prompt.as_deref())
            .bind(input.width)
            .bind(input.height)
            .bind(input.steps)
            .bind(input.guidance)
            .bind(input.seed)
            .bind(JobStatus::Processing.as_str())
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find a job by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<GenerationJob>, sqlx::Error> {
        let query = format!("SELECT {JOB_COLUMNS} FROM generation_jobs WHERE id = $1");
        sqlx::query_as::<_, GenerationJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Terminal transition: `processing` → `succeeded`, linking the
    /// produced asset. Returns true if the row transitioned.
    pub async fn mark_succeeded(
        pool: &PgPool,
        id: Uuid,
        asset_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_jobs \
             SET status = $2, asset_id = $3, updated_at = NOW() \
             WHERE id = $1 AND status = 'processing'",
        )
        .bind(id)
        .bind(JobStatus::Succeeded.as_str())
        .bind(asset_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Terminal transition: `processing` → `failed`, preserving the error
    /// message verbatim. Returns true if the row transitioned.
    pub async fn mark_failed(pool: &PgPool, id: Uuid, error: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE generation_jobs \
             SET status = $2, error = $3, updated_at = NOW() \
             WHERE id = $1 AND status = 'processing'",
        )
        .bind(id)
        .bind(JobStatus::Failed.as_str())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
