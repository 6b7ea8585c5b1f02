//! Workflow outputs.

use chrono::{DateTime, Utc};
use common::{EventId, TicketId};
use domain::{Event, Location};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryView {
    pub name: String,
    pub code: String,
    pub city: String,
    pub place: String,
}

impl From<Location> for CountryView {
    fn from(location: Location) -> Self {
        Self {
            name: location.name,
            code: location.code,
            city: location.city,
            place: location.place,
        }
    }
}

/// An event as returned by searches, without audit fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub event_id: EventId,
    pub name: String,
    pub date_time: DateTime<Utc>,
    pub continent_name: String,
    pub continent_code: String,
    pub country: CountryView,
    pub description: String,
    pub tag: String,
    pub ticket_ids: Vec<TicketId>,
}

impl From<Event> for EventView {
    fn from(event: Event) -> Self {
        Self {
            event_id: event.event_id,
            name: event.name,
            date_time: event.date_time,
            continent_name: event.continent_name,
            continent_code: event.continent_code,
            country: event.country.into(),
            description: event.description,
            tag: event.tag,
            ticket_ids: event.ticket_ids,
        }
    }
}

/// Pagination details of a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub page: u64,
    /// Number of items on this page.
    pub count: u64,
    pub total_page: u64,
    /// Number of matches across all pages.
    pub total_data: u64,
}

impl PageMetadata {
    pub fn new(page: u64, size: u64, count: u64, total_data: u64) -> Self {
        let total_page = if size == 0 {
            0
        } else {
            total_data.div_ceil(size)
        };
        Self {
            page,
            count,
            total_page,
            total_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub collection_data: Vec<EventView>,
    pub meta_data: PageMetadata,
}
