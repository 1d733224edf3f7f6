//! Generation job models and the job status machine.
//!
//! A job row is written exactly twice: inserted as `processing` before the
//! provider call, then updated once to a terminal state. It never re-enters
//! `processing`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use storyloom_core::error::CoreError;
use storyloom_core::types::{Metadata, Timestamp};
use uuid::Uuid;

use crate::models::asset::AssetWithUrl;

/// Status of a single-frame generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Database column value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Parse from the database `status` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "processing" => Ok(Self::Processing),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Internal(format!(
                "Unknown job status '{other}' in database"
            ))),
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Processing)
    }
}

/// A row from the `generation_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationJob {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub scene_id: Uuid,
    pub provider: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub steps: Option<i32>,
    pub guidance: Option<f64>,
    pub seed: Option<i64>,
    pub status: String,
    pub asset_id: Option<Uuid>,
    pub error: Option<String>,
    pub metadata: Metadata,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new job (always starts as `processing`).
#[derive(Debug)]
pub struct CreateGenerationJob {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub scene_id: Uuid,
    pub provider: String,
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub steps: Option<i32>,
    pub guidance: Option<f64>,
    pub seed: Option<i64>,
    pub metadata: Metadata,
}

/// Request body for `POST /status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub job_id: Uuid,
}

/// Response body for the status endpoints.
///
/// `asset` is present once the job has succeeded; `assets` gives the
/// client the scene's latest images so a poll doubles as a gallery refresh.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub job_id: Uuid,
    pub scene_id: Uuid,
    pub status: JobStatus,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<AssetWithUrl>,
    pub assets: Vec<AssetWithUrl>,
    pub metadata: Metadata,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_column_values() {
        for status in [JobStatus::Processing, JobStatus::Succeeded, JobStatus::Failed] {
            assert_eq!(JobStatus::from_name(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_an_internal_error() {
        assert!(JobStatus::from_name("queued").is_err());
    }

    #[test]
    fn only_processing_is_non_terminal() {
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
