//! Outbound "ticket created" notifications.
//!
//! Publishing is fire-and-forget: [`NotificationPublisher::publish`] returns
//! nothing and implementations report delivery problems through logs only.

mod logging;
mod memory;

#[cfg(feature = "kafka")]
mod kafka;

pub use logging::LoggingPublisher;
pub use memory::{InMemoryPublisher, PublishedMessage};

#[cfg(feature = "kafka")]
pub use kafka::KafkaPublisher;

use std::sync::Arc;

use common::{EventId, TicketId};
use serde::{Deserialize, Serialize};

/// Topic ticket notifications go to unless configured otherwise.
pub const DEFAULT_TICKET_CREATED_TOPIC: &str = "concert-create-bank-ticket";

/// Sink for outbound messages.
pub trait NotificationPublisher: Send + Sync {
    /// Hands a message over for delivery without waiting for it.
    fn publish(&self, topic: &str, payload: Vec<u8>, key: Option<Vec<u8>>);
}

impl<T: NotificationPublisher + ?Sized> NotificationPublisher for Arc<T> {
    fn publish(&self, topic: &str, payload: Vec<u8>, key: Option<Vec<u8>>) {
        (**self).publish(topic, payload, key)
    }
}

/// Payload announcing a newly issued ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreated {
    pub ticket_id: TicketId,
    pub event_id: EventId,
}

impl TicketCreated {
    /// Message key: the ticket id, so all messages about one ticket share
    /// a partition.
    pub fn key(&self) -> Vec<u8> {
        self.ticket_id.to_string().into_bytes()
    }
}
