//! Integration tests for the generation job state machine.
//!
//! A job row is inserted as `processing` and transitions out of it at most
//! once; the losing terminal update affects zero rows and leaves the row
//! untouched. These tests run against a live Postgres via `#[sqlx::test]`.

use sqlx::PgPool;
use storyloom_db::models::generation_job::{CreateGenerationJob, JobStatus};
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

fn job_input(owner_id: Uuid, scene_id: Uuid) -> CreateGenerationJob {
    CreateGenerationJob {
        id: Uuid::new_v4(),
        owner_id,
        scene_id,
        provider: "placeholder".to_string(),
        prompt: "Storyboard frame featuring Aria.".to_string(),
        negative_prompt: None,
        width: None,
        height: None,
        steps: None,
        guidance: None,
        seed: None,
        metadata: serde_json::json!({}),
    }
}

// ---------------------------------------------------------------------------
// Test: jobs start in the processing state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn new_jobs_start_processing(pool: PgPool) {
    let owner = Uuid::new_v4();
    let scene_id = seed_scene(&pool, owner).await;

    let job = GenerationJobRepo::create(&pool, &job_input(owner, scene_id))
        .await
        .unwrap();

    assert_eq!(job.status, JobStatus::Processing.as_str());
    assert!(job.asset_id.is_none());
    assert!(job.error.is_none());
}

// ---------------------------------------------------------------------------
// Test: a job reaches exactly one terminal state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn succeeded_job_cannot_transition_again(pool: PgPool) {
    let owner = Uuid::new_v4();
    let scene_id = seed_scene(&pool, owner).await;
    let job = GenerationJobRepo::create(&pool, &job_input(owner, scene_id))
        .await
        .unwrap();
    let asset_id = Uuid::new_v4();

    assert!(GenerationJobRepo::mark_succeeded(&pool, job.id, asset_id)
        .await
        .unwrap());

    // The losing writers affect zero rows.
    assert!(!GenerationJobRepo::mark_failed(&pool, job.id, "too late")
        .await
        .unwrap());
    assert!(
        !GenerationJobRepo::mark_succeeded(&pool, job.id, Uuid::new_v4())
            .await
            .unwrap()
    );

    let found = GenerationJobRepo::find_by_id(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, JobStatus::Succeeded.as_str());
    assert_eq!(found.asset_id, Some(asset_id));
    assert!(found.error.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn failed_job_preserves_the_error_and_stays_failed(pool: PgPool) {
    let owner = Uuid::new_v4();
    let scene_id = seed_scene(&pool, owner).await;
    let job = GenerationJobRepo::create(&pool, &job_input(owner, scene_id))
        .await
        .unwrap();

    let message = "Provider API error (500): boom";
    assert!(GenerationJobRepo::mark_failed(&pool, job.id, message)
        .await
        .unwrap());
    assert!(
        !GenerationJobRepo::mark_succeeded(&pool, job.id, Uuid::new_v4())
            .await
            .unwrap()
    );

    let found = GenerationJobRepo::find_by_id(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.status, JobStatus::Failed.as_str());
    assert_eq!(found.error.as_deref(), Some(message));
    assert!(found.asset_id.is_none());
}

// ---------------------------------------------------------------------------
// Test: polling after termination is stable
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn polls_after_termination_return_the_same_status(pool: PgPool) {
    let owner = Uuid::new_v4();
    let scene_id = seed_scene(&pool, owner).await;
    let job = GenerationJobRepo::create(&pool, &job_input(owner, scene_id))
        .await
        .unwrap();
    let asset_id = Uuid::new_v4();
    GenerationJobRepo::mark_succeeded(&pool, job.id, asset_id)
        .await
        .unwrap();

    let first = GenerationJobRepo::find_by_id(&pool, job.id)
        .await
        .unwrap()
        .unwrap();
    let second = GenerationJobRepo::find_by_id(&pool, job.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.asset_id, second.asset_id);
    assert_eq!(first.updated_at, second.updated_at);
}
