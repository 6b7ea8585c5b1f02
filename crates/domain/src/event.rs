//! Event record.

use chrono::{DateTime, Utc};
use common::{EventId, TicketId, UserId};
use serde::{Deserialize, Serialize};

/// Where an event takes place: a snapshot of the country record plus the
/// venue given by the organizer.
///
/// Copied onto the event and onto every one of its tickets at creation time,
/// so later edits of the country record do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    pub code: String,
    pub city: String,
    pub place: String,
}

/// A schedulable event together with the ids of its ticket inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_id: EventId,
    /// Unique across the event collection.
    pub name: String,
    pub date_time: DateTime<Utc>,
    pub continent_code: String,
    pub continent_name: String,
    pub country: Location,
    pub description: String,
    /// Groups the event with its online ticket configuration. Owned by the
    /// user who first created an event with it.
    pub tag: String,
    /// Ticket ids in the order the ticket types were requested.
    pub ticket_ids: Vec<TicketId>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Returns true if `user` may create further events under this event's tag.
    pub fn tag_usable_by(&self, user: &UserId) -> bool {
        &self.created_by == user
    }
}
