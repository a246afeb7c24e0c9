use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub message: String,
}

/// Envelope broadcast to connected listeners. Best-effort: listeners that
/// lag or disconnect simply miss events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatEvent {
    pub event: String,
    pub message: Message,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    #[error("Validation error: {0}")]
    Validation(String),
}
