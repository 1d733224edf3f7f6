//! Deterministic storage addressing for generated and uploaded imagery.
//!
//! Every stored object lives at `<role-prefix>/<owner>/<entity>/<artifact>.png`
//! inside the bucket implied by its role. The mapping is a pure function of
//! its inputs, so re-running a write for the same identifiers targets the
//! same object (upsert-style idempotency).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Bucket holding character base images and generated pose candidates.
pub const CHARACTER_BUCKET: &str = "character-images";

/// Bucket holding scene references, masks, and rendered frames.
pub const SCENE_BUCKET: &str = "scene-images";

/// The role an object plays in the pipeline, which fixes both its bucket
/// and its path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageRole {
    /// A character's uploaded base image.
    Base,
    /// A generated pose candidate for a character.
    Pose,
    /// A client-uploaded reference image for a scene.
    Reference,
    /// A client-uploaded mask for a scene.
    Mask,
    /// A rendered storyboard frame.
    Render,
}

impl StorageRole {
    /// Path prefix for this role.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Pose => "poses",
            Self::Reference => "references",
            Self::Mask => "masks",
            Self::Render => "renders",
        }
    }

    /// Bucket this role's objects live in.
    pub fn bucket(self) -> &'static str {
        match self {
            Self::Base | Self::Pose => CHARACTER_BUCKET,
            Self::Reference | Self::Mask | Self::Render => SCENE_BUCKET,
        }
    }

    /// Parse an asset `kind` column value into a role.
    ///
    /// Only the scene-scoped roles are valid asset kinds; poses and base
    /// images are addressed through their owning character row instead.
    pub fn from_asset_kind(kind: &str) -> Result<Self, CoreError> {
        match kind {
            "reference" => Ok(Self::Reference),
            "mask" => Ok(Self::Mask),
            "render" => Ok(Self::Render),
            other => Err(CoreError::Validation(format!(
                "Unknown asset kind '{other}'. Must be one of: reference, mask, render"
            ))),
        }
    }
}

/// A durable pointer to one stored object: bucket plus object key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectPointer {
    pub bucket: String,
    pub path: String,
}

/// Map (role, owner, entity, artifact) to its storage location.
///
/// Same inputs always yield the same pointer.
pub fn object_path(role: StorageRole, owner: Uuid, entity: Uuid, artifact: Uuid) -> ObjectPointer {
    ObjectPointer {
        bucket: role.bucket().to_string(),
        path: format!("{}/{owner}/{entity}/{artifact}.png", role.prefix()),
    }
}

/// Rebuild a pointer for an already-persisted path, using the role to pick
/// the bucket.
pub fn pointer_for(role: StorageRole, path: &str) -> ObjectPointer {
    ObjectPointer {
        bucket: role.bucket().to_string(),
        path: path.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (Uuid, Uuid, Uuid) {
        (
            Uuid::parse_str("6f0f8c6a-4b1e-4a0a-9b0e-111111111111").unwrap(),
            Uuid::parse_str("6f0f8c6a-4b1e-4a0a-9b0e-222222222222").unwrap(),
            Uuid::parse_str("6f0f8c6a-4b1e-4a0a-9b0e-333333333333").unwrap(),
        )
    }

    #[test]
    fn addressing_is_idempotent() {
        let (owner, entity, artifact) = ids();
        let a = object_path(StorageRole::Render, owner, entity, artifact);
        let b = object_path(StorageRole::Render, owner, entity, artifact);
        assert_eq!(a, b);
    }

    #[test]
    fn path_follows_scheme() {
        let (owner, entity, artifact) = ids();
        let ptr = object_path(StorageRole::Pose, owner, entity, artifact);
        assert_eq!(ptr.bucket, CHARACTER_BUCKET);
        assert_eq!(ptr.path, format!("poses/{owner}/{entity}/{artifact}.png"));
    }

    #[test]
    fn roles_map_to_expected_buckets() {
        assert_eq!(StorageRole::Base.bucket(), CHARACTER_BUCKET);
        assert_eq!(StorageRole::Pose.bucket(), CHARACTER_BUCKET);
        assert_eq!(StorageRole::Reference.bucket(), SCENE_BUCKET);
        assert_eq!(StorageRole::Mask.bucket(), SCENE_BUCKET);
        assert_eq!(StorageRole::Render.bucket(), SCENE_BUCKET);
    }

    #[test]
    fn distinct_roles_yield_distinct_paths() {
        let (owner, entity, artifact) = ids();
        let reference = object_path(StorageRole::Reference, owner, entity, artifact);
        let mask = object_path(StorageRole::Mask, owner, entity, artifact);
        assert_ne!(reference.path, mask.path);
    }

    #[test]
    fn asset_kind_parsing() {
        assert_eq!(
            StorageRole::from_asset_kind("reference").unwrap(),
            StorageRole::Reference
        );
        assert_eq!(
            StorageRole::from_asset_kind("mask").unwrap(),
            StorageRole::Mask
        );
        assert_eq!(
            StorageRole::from_asset_kind("render").unwrap(),
            StorageRole::Render
        );
        assert!(StorageRole::from_asset_kind("pose").is_err());
        assert!(StorageRole::from_asset_kind("").is_err());
    }

    #[test]
    fn pointer_for_keeps_path_verbatim() {
        let ptr = pointer_for(StorageRole::Render, "renders/a/b/c.png");
        assert_eq!(ptr.bucket, SCENE_BUCKET);
        assert_eq!(ptr.path, "renders/a/b/c.png");
    }
}
