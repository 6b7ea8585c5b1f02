//! Typed repositories over the document store.
//!
//! Each call schedules its store operation as an independent task and hands
//! back a [`Pending`](document_store::Pending) that resolves to one typed
//! result. Stored documents are decoded inside that task, so a record that
//! no longer fits its type surfaces as [`StoreError::Decode`].

mod event;
mod reference;
mod ticket;

pub use event::{EventRepository, EventSearch};
pub use reference::ReferenceDataRepository;
pub use ticket::TicketRepository;

use document_store::{Document, Result, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Collection names in the document store.
pub mod collections {
    pub const EVENT: &str = "event";
    pub const TICKET: &str = "ticket-detail";
    pub const ONLINE_TICKET_CONFIG: &str = "online-ticket-config";
    pub const COUNTRY: &str = "country";
    pub const CONTINENT: &str = "continent";
}

fn decode<T: DeserializeOwned>(collection: &'static str, document: Document) -> Result<T> {
    serde_json::from_value(document).map_err(|source| StoreError::Decode { collection, source })
}

fn decode_optional<T: DeserializeOwned>(
    collection: &'static str,
    document: Option<Document>,
) -> Result<Option<T>> {
    document.map(|d| decode(collection, d)).transpose()
}

fn encode<T: Serialize>(record: &T) -> Result<Document> {
    Ok(serde_json::to_value(record)?)
}
