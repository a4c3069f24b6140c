use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::report::MatchReport;
use crate::services::store::MatchingStatus;

/// Response for the create matching endpoint
///
/// Pairing details are withheld until the matching is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    pub matching_id: Uuid,
    #[serde(flatten)]
    pub report: MatchReport,
}

/// Response for the matching details endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingDetailsResponse {
    pub matching_id: Uuid,
    pub status: MatchingStatus,
    pub confirmed: bool,
    pub attempts_used: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(flatten)]
    pub report: MatchReport,
}

/// Response for the confirm endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmResponse {
    pub message: String,
    pub matching_id: Uuid,
    pub recorded_pairings: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
