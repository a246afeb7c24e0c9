use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageRequest {
    pub symptoms: String,
}

/// Structured assessment returned by the language model collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub severity: i32,
    pub response: String,
    pub category: String,
    #[serde(rename = "betterPrompt")]
    pub better_prompt: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Triage service not configured")]
    NotConfigured,

    #[error("Triage service error: {0}")]
    Upstream(String),

    #[error("Invalid triage response: {0}")]
    InvalidResponse(String),
}
