//! Repository for the `assets` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::asset::{Asset, CreateAsset};

/// Column list for `assets` queries.
const ASSET_COLUMNS: &str = "\
    id, owner_id, scene_id, kind, storage_path, metadata, created_at";

/// Default page size for per-scene asset listings.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for per-scene asset listings.
const MAX_LIMIT: i64 = 100;

pub struct AssetRepo;

impl AssetRepo {
    /// Insert one asset row.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (id, owner_id, scene_id, kind, storage_path, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {ASSET_COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.id)
            .bind(input.owner_id)
            .bind(input.scene_id)
            .bind(&input.kind)
            .bind(&input.storage_path)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Most recent assets for a scene, newest first.
    pub async fn list_recent_for_scene(
        pool: &PgPool,
        scene_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM assets \
             WHERE scene_id = $1 ORDER BY created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(scene_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
