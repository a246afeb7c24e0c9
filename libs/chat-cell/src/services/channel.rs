use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_store::Collection;

use crate::models::{ChatError, ChatEvent, Message};

pub type ChatSender = broadcast::Sender<String>;
pub type ChatReceiver = broadcast::Receiver<String>;

/// In-process chat transport: persisted messages plus a broadcast channel
/// relayed to every connected websocket. Delivery is best-effort.
#[derive(Clone)]
pub struct ChatChannel {
    messages: Collection<Message>,
    sender: ChatSender,
}

impl Default for ChatChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        Self {
            messages: Collection::new(),
            sender,
        }
    }

    pub fn subscribe(&self) -> ChatReceiver {
        self.sender.subscribe()
    }

    /// Persist a message and broadcast it to currently connected listeners.
    pub async fn send(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        body: &str,
    ) -> Result<Message, ChatError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ChatError::Validation("Message body is required".to_string()));
        }

        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            body: body.to_string(),
            sent_at: Utc::now(),
        };
        self.messages.insert(message.clone()).await;

        let event = ChatEvent {
            event: "message".to_string(),
            message: message.clone(),
        };
        match serde_json::to_string(&event) {
            Ok(payload) => {
                // An error just means nobody is listening right now.
                if let Err(e) = self.sender.send(payload) {
                    debug!("No connected chat listeners: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize chat event: {}", e),
        }

        Ok(message)
    }

    /// Re-broadcast a raw websocket frame to all listeners, mirroring the
    /// relay behavior of the socket server this replaces.
    pub fn relay(&self, frame: String) {
        if let Err(e) = self.sender.send(frame) {
            debug!("No connected chat listeners: {}", e);
        }
    }

    /// Conversation between two users, oldest first.
    pub async fn history(&self, user_a: Uuid, user_b: Uuid) -> Vec<Message> {
        let mut messages = self
            .messages
            .filter(|m| {
                (m.sender_id == user_a && m.receiver_id == user_b)
                    || (m.sender_id == user_b && m.receiver_id == user_a)
            })
            .await;
        messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn send_persists_and_broadcasts_to_all_subscribers() {
        let channel = ChatChannel::new();
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let sent = channel.send(alice, bob, "hello doctor").await.unwrap();

        for receiver in [&mut first, &mut second] {
            let frame = receiver.recv().await.unwrap();
            let event: ChatEvent = serde_json::from_str(&frame).unwrap();
            assert_eq!(event.event, "message");
            assert_eq!(event.message.id, sent.id);
            assert_eq!(event.message.body, "hello doctor");
        }
    }

    #[tokio::test]
    async fn history_is_bidirectional_and_chronological() {
        let channel = ChatChannel::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();

        channel.send(alice, bob, "first").await.unwrap();
        channel.send(bob, alice, "second").await.unwrap();
        channel.send(alice, carol, "unrelated").await.unwrap();

        let history = channel.history(alice, bob).await;
        let bodies: Vec<_> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn blank_messages_are_rejected() {
        let channel = ChatChannel::new();
        let result = channel.send(Uuid::new_v4(), Uuid::new_v4(), "  ").await;
        assert_matches!(result, Err(ChatError::Validation(_)));
    }

    #[tokio::test]
    async fn sending_without_listeners_is_not_an_error() {
        let channel = ChatChannel::new();
        let sent = channel.send(Uuid::new_v4(), Uuid::new_v4(), "anyone there?").await;
        assert!(sent.is_ok());
    }
}
