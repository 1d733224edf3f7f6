//! Job status polling.
//!
//! Routes:
//! - `GET /api/v1/status/{job_id}`
//! - `POST /api/v1/status` (body `{ "job_id": ... }`)
//!
//! Both routes return the same payload. Unlike characters and scenes, a
//! foreign-owned job answers 403: job IDs are server-minted UUIDs handed
//! only to their creator, so confirming existence leaks nothing a caller
//! did not already have.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use storyloom_core::addressing::{pointer_for, StorageRole};
use storyloom_core::error::CoreError;
use storyloom_db::models::asset::{Asset, AssetWithUrl};
use storyloom_db::models::generation_job::{JobStatus, StatusRequest, StatusResponse};
use storyloom_db::repositories::{AssetRepo, GenerationJobRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/v1/status/{job_id}
pub async fn get_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(job_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    fetch_status(&state, &user, job_id).await.map(Json)
}

/// POST /api/v1/status
pub async fn post_status(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<StatusRequest>,
) -> AppResult<impl IntoResponse> {
    fetch_status(&state, &user, input.job_id).await.map(Json)
}

async fn fetch_status(
    state: &AppState,
    user: &AuthUser,
    job_id: Uuid,
) -> AppResult<StatusResponse> {
    let job = GenerationJobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Generation job",
            id: job_id,
        }))?;

    if job.owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this generation job".to_string(),
        )));
    }

    let status = JobStatus::from_name(&job.status).map_err(AppError::Core)?;

    let asset = match job.asset_id {
        Some(asset_id) => {
            let asset = AssetRepo::find_by_id(&state.pool, asset_id)
                .await?
                .ok_or(AppError::Core(CoreError::Internal(format!(
                    "Job {job_id} links missing asset {asset_id}"
                ))))?;
            Some(with_signed_url(state, asset).await?)
        }
        None => None,
    };

    let recent = AssetRepo::list_recent_for_scene(&state.pool, job.scene_id, None).await?;
    let mut assets = Vec::with_capacity(recent.len());
    for item in recent {
        assets.push(with_signed_url(state, item).await?);
    }

    Ok(StatusResponse {
        job_id: job.id,
        scene_id: job.scene_id,
        status,
        provider: job.provider,
        error: job.error,
        asset,
        assets,
        metadata: job.metadata,
        created_at: job.created_at,
        updated_at: job.updated_at,
    })
}

/// Sign a read URL for one asset, deriving the bucket from its kind.
async fn with_signed_url(state: &AppState, asset: Asset) -> AppResult<AssetWithUrl> {
    let role = StorageRole::from_asset_kind(&asset.kind).map_err(AppError::Core)?;
    let pointer = pointer_for(role, &asset.storage_path);
    let signed_url = state.store.signed_url(&pointer).await;
    Ok(AssetWithUrl { asset, signed_url })
}
