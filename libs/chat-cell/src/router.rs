use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::channel::ChatChannel;

pub fn message_routes(channel: ChatChannel, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::send_message))
        .route("/{peer_id}", get(handlers::get_conversation))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(channel)
}

/// The websocket endpoint is mounted separately and unauthenticated, matching
/// the open broadcast behavior of the socket server this replaces.
pub fn socket_routes(channel: ChatChannel) -> Router {
    Router::new()
        .route("/", get(handlers::chat_socket))
        .with_state(channel)
}
