//! Scene asset registration and listing.
//!
//! Routes:
//! - `POST /api/v1/scenes/{scene_id}/assets` -- register an uploaded image
//! - `GET  /api/v1/scenes/{scene_id}/assets` -- list recent scene assets
//!
//! Registration covers client-supplied imagery only (references and masks).
//! Render rows are written by the generation handlers and cannot be
//! registered from outside.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use storyloom_core::addressing::{pointer_for, StorageRole};
use storyloom_core::error::CoreError;
use storyloom_db::models::asset::{AssetWithUrl, CreateAsset, RegisterAssetRequest};
use storyloom_db::repositories::AssetRepo;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::load_owned_scene;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListAssetsParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ListAssetsResponse {
    pub scene_id: Uuid,
    pub assets: Vec<AssetWithUrl>,
}

/// POST /api/v1/scenes/{scene_id}/assets
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Path(scene_id): Path<Uuid>,
    Json(input): Json<RegisterAssetRequest>,
) -> AppResult<impl IntoResponse> {
    let role = StorageRole::from_asset_kind(&input.kind).map_err(AppError::Core)?;
    if role == StorageRole::Render {
        return Err(AppError::Core(CoreError::Validation(
            "Render assets are created by generation, not registered".to_string(),
        )));
    }
    if input.storage_path.trim().is_empty() {
        return Err(AppError::BadRequest(
            "storage_path must not be empty".to_string(),
        ));
    }

    let scene = load_owned_scene(&state, user.user_id, scene_id).await?;

    let asset = AssetRepo::create(
        &state.pool,
        &CreateAsset {
            id: Uuid::new_v4(),
            owner_id: user.user_id,
            scene_id: scene.id,
            kind: input.kind,
            storage_path: input.storage_path,
            metadata: input.metadata.unwrap_or_else(|| serde_json::json!({})),
        },
    )
    .await?;

    let pointer = pointer_for(role, &asset.storage_path);
    let signed_url = state.store.signed_url(&pointer).await;

    Ok((StatusCode::CREATED, Json(AssetWithUrl { asset, signed_url })))
}

/// GET /api/v1/scenes/{scene_id}/assets
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(scene_id): Path<Uuid>,
    Query(params): Query<ListAssetsParams>,
) -> AppResult<impl IntoResponse> {
    let scene = load_owned_scene(&state, user.user_id, scene_id).await?;

    let rows = AssetRepo::list_recent_for_scene(&state.pool, scene.id, params.limit).await?;
    let mut assets = Vec::with_capacity(rows.len());
    for asset in rows {
        let role = StorageRole::from_asset_kind(&asset.kind).map_err(AppError::Core)?;
        let pointer = pointer_for(role, &asset.storage_path);
        let signed_url = state.store.signed_url(&pointer).await;
        assets.push(AssetWithUrl { asset, signed_url });
    }

    Ok(Json(ListAssetsResponse {
        scene_id: scene.id,
        assets,
    }))
}
