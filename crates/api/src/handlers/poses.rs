//! Pose batch generation.
//!
//! Route: `POST /api/v1/pose-generation`
//!
//! Generates one candidate per requested pose spec, scores each candidate
//! against its intended description, marks the top K approved, and persists
//! the whole batch. Provider failures degrade to placeholders inside the
//! generator facade, so this path never fails on an upstream outage.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use storyloom_core::addressing::{object_path, StorageRole};
use storyloom_core::error::CoreError;
use storyloom_core::{prompt, scoring};
use storyloom_db::models::pose::{
    CreatePose, GeneratePosesRequest, GeneratePosesResponse, PoseCandidateResponse,
};
use storyloom_db::repositories::{CharacterRepo, PoseRepo};
use storyloom_providers::{resolve_provider, Generator, PoseRequest};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::handlers::load_owned_character;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /api/v1/pose-generation
pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<GeneratePosesRequest>,
) -> AppResult<impl IntoResponse> {
    if input.poses.is_empty() {
        return Err(AppError::BadRequest("poses must not be empty".to_string()));
    }
    for spec in &input.poses {
        if spec.label.trim().is_empty() || spec.description.trim().is_empty() {
            return Err(AppError::BadRequest(
                "each pose requires a non-empty label and description".to_string(),
            ));
        }
    }

    let character = load_owned_character(&state, user.user_id, input.character_id).await?;

    let base_image_path = character.base_image_path.as_deref().ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Character has no base image uploaded".to_string(),
        ))
    })?;

    let base_pointer =
        storyloom_core::addressing::pointer_for(StorageRole::Base, base_image_path);
    let base_image = state.store.download(&base_pointer).await?;

    let provider = resolve_provider(&state.config.providers, input.provider.as_deref())
        .map_err(AppError::Core)?;
    let generator = Generator::new(provider);
    let provider_name = generator.provider_name().to_string();

    // Generate and score every candidate first; approval needs the whole
    // batch's scores.
    let mut candidates = Vec::with_capacity(input.poses.len());
    let mut scores = Vec::with_capacity(input.poses.len());

    for spec in &input.poses {
        let composed = prompt::compose_pose_prompt(
            &character.name,
            &spec.label,
            &spec.description,
            spec.long_description.as_deref(),
            spec.scene_use_case.as_deref(),
        );

        let image = generator
            .pose(&PoseRequest {
                base_image: base_image.clone(),
                prompt: composed.clone(),
                references: Vec::new(),
            })
            .await;

        let intended = match spec.long_description.as_deref() {
            Some(long) => format!("{} {long}", spec.description),
            None => spec.description.clone(),
        };
        let candidate_text = format!(
            "{} {} {}",
            spec.label, spec.description, image.metadata.prompt
        );
        scores.push(scoring::score_candidate(&intended, &candidate_text));
        candidates.push((composed, image));
    }

    let keep_top = scoring::clamp_keep_top(input.keep_top);
    let approved = scoring::select_top_k(&scores, keep_top);

    // Persist the batch with its approval flags, uploading each image to
    // its deterministic pose path.
    let mut responses = Vec::with_capacity(candidates.len());
    for (i, ((composed, image), spec)) in
        candidates.into_iter().zip(input.poses.iter()).enumerate()
    {
        let pose_id = Uuid::new_v4();
        let pointer = object_path(
            StorageRole::Pose,
            character.owner_id,
            character.id,
            pose_id,
        );
        state.store.upload(&pointer, image.bytes).await?;

        let metadata = serde_json::to_value(&image.metadata)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize metadata: {e}")))?;

        let pose = PoseRepo::create(
            &state.pool,
            &CreatePose {
                id: pose_id,
                owner_id: user.user_id,
                character_id: character.id,
                pose_label: spec.label.clone(),
                pose_description: spec.description.clone(),
                scene_use_case: spec.scene_use_case.clone(),
                generated_image_path: pointer.path.clone(),
                score: scores[i],
                approved_for_scene: approved[i],
                provider: image.metadata.provider.clone(),
                prompt: composed,
                metadata,
            },
        )
        .await?;

        let signed_url = state.store.signed_url(&pointer).await;
        responses.push(PoseCandidateResponse {
            id: pose.id,
            pose_label: pose.pose_label,
            pose_description: pose.pose_description,
            score: pose.score,
            approved_for_scene: pose.approved_for_scene,
            generated_image_url: pose.generated_image_path,
            signed_url,
        });
    }

    CharacterRepo::mark_pose_library(&state.pool, character.id).await?;

    tracing::info!(
        character_id = %character.id,
        provider = %provider_name,
        batch = responses.len(),
        keep_top,
        "Pose batch generated"
    );

    Ok((
        StatusCode::CREATED,
        Json(GeneratePosesResponse {
            character_id: character.id,
            provider: provider_name,
            poses: responses,
        }),
    ))
}
