use std::sync::{Arc, RwLock};

use super::NotificationPublisher;

/// A message captured by [`InMemoryPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
    pub key: Option<Vec<u8>>,
}

impl PublishedMessage {
    /// Decodes the payload as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.payload)
    }
}

/// Publisher that keeps every message in memory, for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublisher {
    messages: Arc<RwLock<Vec<PublishedMessage>>>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all messages published so far, oldest first.
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn message_count(&self) -> usize {
        self.messages.read().map(|m| m.len()).unwrap_or(0)
    }
}

impl NotificationPublisher for InMemoryPublisher {
    fn publish(&self, topic: &str, payload: Vec<u8>, key: Option<Vec<u8>>) {
        let message = PublishedMessage {
            topic: topic.to_string(),
            payload,
            key,
        };
        match self.messages.write() {
            Ok(mut messages) => messages.push(message),
            Err(_) => tracing::error!(topic, "in-memory publisher lock poisoned, message dropped"),
        }
    }
}
