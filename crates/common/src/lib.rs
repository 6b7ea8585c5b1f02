//! Identifier types shared by every crate of the event provisioning service.

mod types;

pub use types::{EventId, TicketId, UserId};
