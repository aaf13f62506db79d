// src/api/types.rs

use serde::{Deserialize, Serialize};

/// Request body for tracking a tool interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRequest {
    pub user_id: String,
    pub tool_id: String,
    pub action: String,
    pub success: bool,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Response for a tracked interaction.
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub status: String,
    /// Events currently held in the in-memory log for this user.
    pub events_tracked: usize,
}

/// Request body for context enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichRequest {
    pub user_id: String,
    pub tool_id: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
