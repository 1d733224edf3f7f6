//! Request handlers for the generation pipeline.
//!
//! Every handler validates caller ownership of referenced entities before
//! any provider call or storage transfer; a foreign-owned character or
//! scene is reported as not-found so probing requests cannot confirm the
//! entity exists.

pub mod assets;
pub mod frames;
pub mod jobs;
pub mod poses;

use storyloom_core::error::CoreError;
use storyloom_db::models::character::Character;
use storyloom_db::models::scene::Scene;
use storyloom_db::repositories::{CharacterRepo, SceneRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a character and verify the caller owns it.
///
/// Absent and foreign-owned characters are indistinguishable to the caller.
pub(crate) async fn load_owned_character(
    state: &AppState,
    user_id: Uuid,
    character_id: Uuid,
) -> AppResult<Character> {
    let character = CharacterRepo::find_by_id(&state.pool, character_id)
        .await?
        .filter(|c| c.owner_id == user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id: character_id,
        }))?;
    Ok(character)
}

/// Load a scene and verify the caller owns it.
pub(crate) async fn load_owned_scene(
    state: &AppState,
    user_id: Uuid,
    scene_id: Uuid,
) -> AppResult<Scene> {
    let scene = SceneRepo::find_by_id(&state.pool, scene_id)
        .await?
        .filter(|s| s.owner_id == user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scene",
            id: scene_id,
        }))?;
    Ok(scene)
}
