pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pose-generation              generate + score a pose batch (POST)
/// /scene-generation             generate one frame, job-tracked (POST)
/// /scene-continuation           generate N continuation variants (POST)
///
/// /status/{job_id}              poll a generation job (GET)
/// /status                       poll a generation job, body variant (POST)
///
/// /scenes/{scene_id}/assets     register uploaded image (POST), list (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Generation endpoints.
        .route("/pose-generation", post(handlers::poses::generate))
        .route("/scene-generation", post(handlers::frames::generate))
        .route("/scene-continuation", post(handlers::frames::continue_scene))
        // Job status polling (path and body variants return the same payload).
        .route("/status/{job_id}", get(handlers::jobs::get_status))
        .route("/status", post(handlers::jobs::post_status))
        // Scene asset registration and listing.
        .route(
            "/scenes/{scene_id}/assets",
            post(handlers::assets::register).get(handlers::assets::list),
        )
}
