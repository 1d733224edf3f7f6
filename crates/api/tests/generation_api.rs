//! HTTP-level integration tests for the generation endpoints: ownership
//! isolation on status polling and request validation.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_auth, post_json_auth, token_for};
use sqlx::PgPool;
use storyloom_db::models::generation_job::CreateGenerationJob;
use storyloom_db::repositories::GenerationJobRepo;
use uuid::Uuid;

/// Insert the scene row a job's foreign key needs.
async fn seed_scene(pool: &PgPool, owner_id: Uuid) -> Uuid {
    let scene_id = Uuid::new_v4();
    sqlx::query("INSERT INTO scenes (id, owner_id, title) VALUES ($1, $2, $3)")
        .bind(scene_id)
        .bind(owner_id)
        .bind("Test scene")
        .execute(pool)
        .await
        .expect("scene insert should succeed");
    scene_id
}

/// Insert a processing job owned by the given user, with a recognizable
/// prompt so leak assertions have something to look for.
async fn seed_job(pool: &PgPool, owner_id: Uuid, scene_id: Uuid, prompt: &str) -> Uuid {
    let job = GenerationJobRepo::create(
        pool,
        &CreateGenerationJob {
            id: Uuid::new_v4(),
            owner_id,
            scene_id,
            provider: "placeholder".to_string(),
            prompt: prompt.to_string(),
            negative_prompt: None,
            width: None,
            height: None,
            steps: None,
            guidance: None,
            seed: None,
            metadata: serde_json::json!({}),
        },
    )
    .await
    .expect("job insert should succeed");
    job.id
}

// ---------------------------------------------------------------------------
// Test: a status request for someone else's job returns 403, no content
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn status_for_foreign_job_returns_403_without_content(pool: PgPool) {
    let owner = Uuid::new_v4();
    let scene_id = seed_scene(&pool, owner).await;
    let prompt = "a moonlit rooftop chase nobody else should read";
    let job_id = seed_job(&pool, owner, scene_id, prompt).await;

    let intruder = Uuid::new_v4();
    let app = build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/status/{job_id}"), &token_for(intruder)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
    // No job content may leak to the intruder.
    let rendered = json.to_string();
    assert!(!rendered.contains(prompt));
    assert!(!rendered.contains(&scene_id.to_string()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn status_body_variant_applies_the_same_owner_check(pool: PgPool) {
    let owner = Uuid::new_v4();
    let scene_id = seed_scene(&pool, owner).await;
    let job_id = seed_job(&pool, owner, scene_id, "private prompt").await;

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/status",
        &token_for(Uuid::new_v4()),
        serde_json::json!({ "job_id": job_id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: the owner can poll their own job
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_can_poll_their_own_job(pool: PgPool) {
    let owner = Uuid::new_v4();
    let scene_id = seed_scene(&pool, owner).await;
    let job_id = seed_job(&pool, owner, scene_id, "the owner's prompt").await;

    let app = build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/status/{job_id}"), &token_for(owner)).await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["job_id"], job_id.to_string());
    assert_eq!(json["scene_id"], scene_id.to_string());
    assert_eq!(json["status"], "processing");
}

// ---------------------------------------------------------------------------
// Test: unknown jobs are 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn status_for_unknown_job_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/status/{}", Uuid::new_v4()),
        &token_for(Uuid::new_v4()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Test: non-positive frame dimensions are rejected before any lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn negative_frame_dimensions_are_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/scene-generation",
        &token_for(Uuid::new_v4()),
        serde_json::json!({
            "scene_id": Uuid::new_v4(),
            "character_id": Uuid::new_v4(),
            "prompt": "she crosses the bridge",
            "width": -512,
            "height": 512,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "width must be >= 1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn zero_height_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/scene-generation",
        &token_for(Uuid::new_v4()),
        serde_json::json!({
            "scene_id": Uuid::new_v4(),
            "character_id": Uuid::new_v4(),
            "prompt": "she crosses the bridge",
            "height": 0,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "height must be >= 1");
}
