use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        Extension, Path, State,
    },
    response::Response,
    Json,
};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{ChatError, SendMessageRequest};
use crate::services::channel::ChatChannel;

fn caller_uuid(user: &AuthUser) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid user id".to_string()))
}

#[axum::debug_handler]
pub async fn send_message(
    State(channel): State<ChatChannel>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<Value>, AppError> {
    let sender_id = caller_uuid(&user)?;

    let message = channel
        .send(sender_id, request.receiver_id, &request.message)
        .await
        .map_err(|e| match e {
            ChatError::Validation(msg) => AppError::BadRequest(msg),
        })?;

    Ok(Json(json!({
        "success": true,
        "message": message
    })))
}

/// Conversation history between the caller and a peer, oldest first.
#[axum::debug_handler]
pub async fn get_conversation(
    State(channel): State<ChatChannel>,
    Path(peer_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let caller = caller_uuid(&user)?;
    let messages = channel.history(caller, peer_id).await;

    Ok(Json(json!({
        "messages": messages,
        "total": messages.len()
    })))
}

/// Websocket endpoint: every connected client receives all broadcast events;
/// incoming frames are relayed to everyone, like the socket server this
/// replaces.
pub async fn chat_socket(
    State(channel): State<ChatChannel>,
    upgrade: WebSocketUpgrade,
) -> Response {
    upgrade.on_upgrade(move |socket| handle_socket(socket, channel))
}

async fn handle_socket(socket: WebSocket, channel: ChatChannel) {
    info!("Chat listener connected");
    let (mut sink, mut stream) = socket.split();
    let mut events = channel.subscribe();

    let mut forward = tokio::spawn(async move {
        while let Ok(payload) = events.recv().await {
            if sink.send(WsMessage::Text(payload.into())).await.is_err() {
                break;
            }
        }
    });

    let relay_channel = channel.clone();
    let mut relay = tokio::spawn(async move {
        while let Some(Ok(frame)) = stream.next().await {
            if let WsMessage::Text(text) = frame {
                relay_channel.relay(text.to_string());
            }
        }
    });

    // Whichever side closes first tears the connection down.
    tokio::select! {
        _ = &mut forward => relay.abort(),
        _ = &mut relay => forward.abort(),
    }

    debug!("Chat listener disconnected");
}
