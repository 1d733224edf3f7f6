//! Prompt composition for pose, frame, and continuation generation.
//!
//! Providers receive exactly one composed natural-language prompt; reference
//! descriptors enrich that prompt as trailing clauses and are never used for
//! control flow.

use serde::{Deserialize, Serialize};

/// Clause appended to every scene prompt so consecutive frames keep the
/// character's look, wardrobe, and lighting coherent.
pub const CONTINUITY_CLAUSE: &str = "Maintain the same character appearance, \
wardrobe, art style, and lighting as the supplied reference images.";

/// One reference descriptor passed alongside image bytes.
///
/// `role` and `path` identify the object; only `description` feeds the
/// prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceDescriptor {
    pub role: String,
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Compose the prompt for one pose candidate.
pub fn compose_pose_prompt(
    character_name: &str,
    label: &str,
    description: &str,
    long_description: Option<&str>,
    scene_use_case: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Full-body character pose of {character_name}: {label}. {description}"
    );
    if let Some(long) = long_description {
        if !long.trim().is_empty() {
            prompt.push(' ');
            prompt.push_str(long.trim());
        }
    }
    if let Some(use_case) = scene_use_case {
        if !use_case.trim().is_empty() {
            prompt.push_str(&format!(" Intended scene use: {}.", use_case.trim()));
        }
    }
    prompt.push_str(" Keep the character identical to the base reference image.");
    prompt
}

/// Compose the prompt for a single storyboard frame or continuation variant.
///
/// Character and pose context come first, then the user's direction, then the
/// fixed continuity clause and any reference descriptions.
pub fn compose_scene_prompt(
    character_name: &str,
    pose_label: Option<&str>,
    user_prompt: &str,
    references: &[ReferenceDescriptor],
) -> String {
    let mut prompt = format!("Storyboard frame featuring {character_name}");
    if let Some(pose) = pose_label {
        prompt.push_str(&format!(" in the '{pose}' pose"));
    }
    prompt.push_str(&format!(". {}", user_prompt.trim()));
    if !prompt.ends_with('.') {
        prompt.push('.');
    }
    prompt.push(' ');
    prompt.push_str(CONTINUITY_CLAUSE);

    for reference in references {
        if let Some(desc) = reference.description.as_deref() {
            if !desc.trim().is_empty() {
                prompt.push_str(&format!(" Reference ({}): {}.", reference.role, desc.trim()));
            }
        }
    }
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_prompt_includes_label_and_description() {
        let prompt = compose_pose_prompt("Aria", "Run", "sprinting forward", None, None);
        assert!(prompt.contains("Aria"));
        assert!(prompt.contains("Run"));
        assert!(prompt.contains("sprinting forward"));
    }

    #[test]
    fn pose_prompt_appends_optional_fields() {
        let prompt = compose_pose_prompt(
            "Aria",
            "Run",
            "sprinting forward",
            Some("mid-stride, arms pumping"),
            Some("chase sequences"),
        );
        assert!(prompt.contains("mid-stride, arms pumping"));
        assert!(prompt.contains("Intended scene use: chase sequences."));
    }

    #[test]
    fn scene_prompt_always_carries_continuity_clause() {
        let prompt = compose_scene_prompt("Aria", None, "she enters the library", &[]);
        assert!(prompt.contains(CONTINUITY_CLAUSE));
    }

    #[test]
    fn scene_prompt_mentions_pose_when_present() {
        let prompt = compose_scene_prompt("Aria", Some("Run"), "down the corridor", &[]);
        assert!(prompt.contains("'Run' pose"));
    }

    #[test]
    fn references_enrich_the_prompt_only() {
        let refs = vec![
            ReferenceDescriptor {
                role: "previous_frame".into(),
                path: "renders/a/b/c.png".into(),
                description: Some("Aria at the library door".into()),
            },
            ReferenceDescriptor {
                role: "mask".into(),
                path: "masks/a/b/d.png".into(),
                description: None,
            },
        ];
        let prompt = compose_scene_prompt("Aria", None, "she steps inside", &refs);
        assert!(prompt.contains("Reference (previous_frame): Aria at the library door."));
        // Descriptor without text contributes nothing.
        assert!(!prompt.contains("masks/a/b/d.png"));
    }
}
