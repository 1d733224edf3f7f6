//! Scene frame generation: the async single-frame job path and the
//! multi-variant continuation path.
//!
//! Routes:
//! - `POST /api/v1/scene-generation`   -- one frame, tracked by a job row
//! - `POST /api/v1/scene-continuation` -- N variants, synchronous
//!
//! The single-frame path writes a `generation_jobs` row before the provider
//! call and gives it exactly one terminal update; provider failures there
//! are recorded on the job verbatim and surfaced as 502. The continuation
//! path goes through the degrading generator facade and never fails on a
//! provider error.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use storyloom_core::addressing::{object_path, pointer_for, StorageRole};
use storyloom_core::error::CoreError;
use storyloom_core::prompt::{self, ReferenceDescriptor};
use storyloom_db::models::asset::CreateAsset;
use storyloom_db::models::character::Character;
use storyloom_db::models::generation_job::CreateGenerationJob;
use storyloom_db::models::pose::Pose;
use storyloom_db::models::scene_frame::{
    variant_assignments, ContinueSceneRequest, ContinueSceneResponse, CreateSceneFrame,
    FrameResponse, GenerateFrameRequest, GenerateFrameResponse,
};
use storyloom_db::repositories::{
    AssetRepo, GenerationJobRepo, PoseRepo, SceneFrameRepo,
};
use storyloom_providers::{
    resolve_provider, ContinuationRequest, FrameRequest, GeneratedImage, Generator,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_owned_character, load_owned_scene};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// How many prior frames feed a continuation as continuity references.
const CONTINUITY_FRAME_COUNT: i64 = 2;

// ---------------------------------------------------------------------------
// Single frame (async job path)
// ---------------------------------------------------------------------------

/// POST /api/v1/scene-generation
pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<GenerateFrameRequest>,
) -> AppResult<impl IntoResponse> {
    if input.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("prompt must not be empty".to_string()));
    }
    for (field, value) in [("width", input.width), ("height", input.height)] {
        if matches!(value, Some(v) if v < 1) {
            return Err(AppError::BadRequest(format!("{field} must be >= 1")));
        }
    }

    let scene = load_owned_scene(&state, user.user_id, input.scene_id).await?;
    let character = load_owned_character(&state, user.user_id, input.character_id).await?;
    let pose = load_optional_pose(&state, &user, &character, input.pose_id).await?;

    let (base_image, pose_image, references) =
        download_references(&state, &character, pose.as_ref()).await?;

    let composed = prompt::compose_scene_prompt(
        &character.name,
        pose.as_ref().map(|p| p.pose_label.as_str()),
        &input.prompt,
        &references,
    );

    let provider = resolve_provider(&state.config.providers, input.provider.as_deref())
        .map_err(AppError::Core)?;
    let generator = Generator::new(provider);
    let provider_name = generator.provider_name().to_string();

    let frame_index = SceneFrameRepo::max_frame_index(&state.pool, scene.id)
        .await?
        .unwrap_or(0)
        + 1;

    // The job row exists before the provider call and receives exactly one
    // terminal update below.
    let job = GenerationJobRepo::create(
        &state.pool,
        &CreateGenerationJob {
            id: Uuid::new_v4(),
            owner_id: user.user_id,
            scene_id: scene.id,
            provider: provider_name.clone(),
            prompt: composed.clone(),
            negative_prompt: None,
            width: input.width,
            height: input.height,
            steps: None,
            guidance: None,
            seed: None,
            metadata: json!({
                "character_id": character.id,
                "pose_id": pose.as_ref().map(|p| p.id),
                "frame_index": frame_index,
            }),
        },
    )
    .await?;

    let request = FrameRequest {
        base_image,
        pose_image,
        prompt: composed.clone(),
        width: input.width.and_then(|w| u32::try_from(w).ok()),
        height: input.height.and_then(|h| u32::try_from(h).ok()),
        references: references.clone(),
    };

    let outcome = run_frame_generation(
        &state,
        &user,
        &generator,
        &request,
        FramePersistence {
            scene_id: scene.id,
            character_id: Some(character.id),
            pose_id: pose.as_ref().map(|p| p.id),
            frame_index,
            references: &references,
            prompt: &composed,
            job_id: Some(job.id),
        },
    )
    .await;

    match outcome {
        Ok((frame_response, asset_id)) => {
            GenerationJobRepo::mark_succeeded(&state.pool, job.id, asset_id).await?;
            tracing::info!(
                job_id = %job.id,
                scene_id = %scene.id,
                provider = %provider_name,
                "Frame generated"
            );
            Ok((
                StatusCode::CREATED,
                Json(GenerateFrameResponse {
                    scene_id: scene.id,
                    provider: provider_name,
                    job_id: job.id,
                    frame: frame_response,
                }),
            ))
        }
        Err(err) => {
            // Preserve the original failure message on the job, not the
            // sanitized HTTP rendering.
            let message = match &err {
                AppError::Provider(msg) => msg.clone(),
                other => other.to_string(),
            };
            if let Err(update_err) =
                GenerationJobRepo::mark_failed(&state.pool, job.id, &message).await
            {
                tracing::error!(
                    job_id = %job.id,
                    error = %update_err,
                    "Failed to record job failure"
                );
            }
            Err(err)
        }
    }
}

/// Column values shared by the asset + frame rows one generation produces.
struct FramePersistence<'a> {
    scene_id: Uuid,
    character_id: Option<Uuid>,
    pose_id: Option<Uuid>,
    frame_index: i32,
    references: &'a [ReferenceDescriptor],
    prompt: &'a str,
    job_id: Option<Uuid>,
}

/// Call the provider once and persist the render as an asset + frame pair.
///
/// Fallible end to end: the caller owns the job's terminal transition.
async fn run_frame_generation(
    state: &AppState,
    user: &AuthUser,
    generator: &Generator,
    request: &FrameRequest,
    persistence: FramePersistence<'_>,
) -> AppResult<(FrameResponse, Uuid)> {
    let image = generator
        .frame(request)
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    persist_render(
        state,
        user,
        image,
        &persistence,
        None, // no variant group on the single-frame path
        None,
        true,
    )
    .await
}

// ---------------------------------------------------------------------------
// Continuation (synchronous multi-variant path)
// ---------------------------------------------------------------------------

/// POST /api/v1/scene-continuation
pub async fn continue_scene(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ContinueSceneRequest>,
) -> AppResult<impl IntoResponse> {
    if input.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("prompt must not be empty".to_string()));
    }
    if let Some(index) = input.frame_index {
        if index < 1 {
            return Err(AppError::BadRequest("frame_index must be >= 1".to_string()));
        }
    }

    let scene = load_owned_scene(&state, user.user_id, input.scene_id).await?;
    let character = load_owned_character(&state, user.user_id, input.character_id).await?;
    let pose = load_optional_pose(&state, &user, &character, input.pose_id).await?;

    let (base_image, pose_image, mut references) =
        download_references(&state, &character, pose.as_ref()).await?;

    // Up to two most recent prior frames, newest first, as continuity
    // references.
    let prior = SceneFrameRepo::recent_for_scene(&state.pool, scene.id, CONTINUITY_FRAME_COUNT)
        .await?;
    let mut previous_frames = Vec::with_capacity(prior.len());
    for frame in &prior {
        let pointer = pointer_for(StorageRole::Render, &frame.output_image_path);
        previous_frames.push(state.store.download(&pointer).await?);
        references.push(ReferenceDescriptor {
            role: "previous_frame".to_string(),
            path: frame.output_image_path.clone(),
            description: Some(format!("Previous frame {}", frame.frame_index)),
        });
    }

    let frame_index = match input.frame_index {
        Some(index) => index,
        None => {
            SceneFrameRepo::max_frame_index(&state.pool, scene.id)
                .await?
                .unwrap_or(0)
                + 1
        }
    };

    let composed = prompt::compose_scene_prompt(
        &character.name,
        pose.as_ref().map(|p| p.pose_label.as_str()),
        &input.prompt,
        &references,
    );

    let provider = resolve_provider(&state.config.providers, input.provider.as_deref())
        .map_err(AppError::Core)?;
    let generator = Generator::new(provider);
    let provider_name = generator.provider_name().to_string();

    let variants = state.config.providers.variants();
    let images = generator
        .continuation(&ContinuationRequest {
            frame: FrameRequest {
                base_image,
                pose_image,
                prompt: composed.clone(),
                width: None,
                height: None,
                references: references.clone(),
            },
            previous_frames,
            variants,
        })
        .await;

    // All variants share one group; by convention the first is selected.
    let variant_group_id = Uuid::new_v4();
    let assignments = variant_assignments(images.len());
    let mut frames = Vec::with_capacity(images.len());
    for (image, (variant_index, selected)) in images.into_iter().zip(assignments) {
        let (frame_response, _) = persist_render(
            &state,
            &user,
            image,
            &FramePersistence {
                scene_id: scene.id,
                character_id: Some(character.id),
                pose_id: pose.as_ref().map(|p| p.id),
                frame_index,
                references: &references,
                prompt: &composed,
                job_id: None,
            },
            Some(variant_group_id),
            Some(variant_index),
            selected,
        )
        .await?;
        frames.push(frame_response);
    }

    tracing::info!(
        scene_id = %scene.id,
        provider = %provider_name,
        variant_group_id = %variant_group_id,
        variants = frames.len(),
        "Continuation variants generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(ContinueSceneResponse {
            scene_id: scene.id,
            provider: provider_name,
            variant_group_id,
            frames,
        }),
    ))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Resolve an optional pose reference, verifying ownership and that the
/// pose belongs to the requested character.
async fn load_optional_pose(
    state: &AppState,
    user: &AuthUser,
    character: &Character,
    pose_id: Option<Uuid>,
) -> AppResult<Option<Pose>> {
    let Some(pose_id) = pose_id else {
        return Ok(None);
    };

    let pose = PoseRepo::find_by_id(&state.pool, pose_id)
        .await?
        .filter(|p| p.owner_id == user.user_id && p.character_id == character.id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Pose",
            id: pose_id,
        }))?;
    Ok(Some(pose))
}

/// Download the character base image (required) and pose image (optional),
/// returning them with their reference descriptors.
async fn download_references(
    state: &AppState,
    character: &Character,
    pose: Option<&Pose>,
) -> AppResult<(Vec<u8>, Option<Vec<u8>>, Vec<ReferenceDescriptor>)> {
    let base_image_path = character.base_image_path.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Character has no base image uploaded".to_string(),
        ))
    })?;

    let base_pointer = pointer_for(StorageRole::Base, base_image_path);
    let base_image = state.store.download(&base_pointer).await?;

    let mut references = vec![ReferenceDescriptor {
        role: "base".to_string(),
        path: base_image_path.to_string(),
        description: Some(format!("Base appearance of {}", character.name)),
    }];

    let pose_image = match pose {
        Some(pose) => {
            let pointer = pointer_for(StorageRole::Pose, &pose.generated_image_path);
            let bytes = state.store.download(&pointer).await?;
            references.push(ReferenceDescriptor {
                role: "pose".to_string(),
                path: pose.generated_image_path.clone(),
                description: Some(format!(
                    "{} pose: {}",
                    pose.pose_label, pose.pose_description
                )),
            });
            Some(bytes)
        }
        None => None,
    };

    Ok((base_image, pose_image, references))
}

/// Upload one render and insert its asset + frame rows.
async fn persist_render(
    state: &AppState,
    user: &AuthUser,
    image: GeneratedImage,
    persistence: &FramePersistence<'_>,
    variant_group_id: Option<Uuid>,
    variant_index: Option<i32>,
    selected: bool,
) -> AppResult<(FrameResponse, Uuid)> {
    let artifact_id = Uuid::new_v4();
    let pointer = object_path(
        StorageRole::Render,
        user.user_id,
        persistence.scene_id,
        artifact_id,
    );
    state.store.upload(&pointer, image.bytes).await?;

    let provider_metadata = serde_json::to_value(&image.metadata)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize metadata: {e}")))?;

    let asset = AssetRepo::create(
        &state.pool,
        &CreateAsset {
            id: Uuid::new_v4(),
            owner_id: user.user_id,
            scene_id: persistence.scene_id,
            kind: "render".to_string(),
            storage_path: pointer.path.clone(),
            metadata: json!({
                "bucket": pointer.bucket,
                "provider": image.metadata.provider,
                "prompt": persistence.prompt,
                "job_id": persistence.job_id,
                "variant_group_id": variant_group_id,
                "variant_index": variant_index,
            }),
        },
    )
    .await?;

    let input_refs = serde_json::to_value(persistence.references)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize references: {e}")))?;

    let frame = SceneFrameRepo::create(
        &state.pool,
        &CreateSceneFrame {
            id: Uuid::new_v4(),
            owner_id: user.user_id,
            scene_id: persistence.scene_id,
            frame_index: persistence.frame_index,
            character_id: persistence.character_id,
            pose_id: persistence.pose_id,
            input_refs,
            prompt: persistence.prompt.to_string(),
            output_image_path: pointer.path.clone(),
            variant_group_id,
            variant_index,
            selected,
            metadata: provider_metadata,
        },
    )
    .await?;

    let signed_url = state.store.signed_url(&pointer).await;

    Ok((
        FrameResponse {
            id: frame.id,
            frame_index: frame.frame_index,
            output_image_url: frame.output_image_path,
            signed_url,
            variant_index: frame.variant_index,
            selected: frame.selected,
        },
        asset.id,
    ))
}
