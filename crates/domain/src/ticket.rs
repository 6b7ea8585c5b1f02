//! Ticket inventory and online sales configuration records.

use chrono::{DateTime, Utc};
use common::{EventId, TicketId, UserId};
use serde::{Deserialize, Serialize};

use crate::event::{Event, Location};

/// Ticket type names used by the organizer tooling. Not enforced.
pub mod ticket_type {
    pub const ONLINE: &str = "Online";
    pub const GOLD: &str = "Gold";
    pub const SILVER: &str = "Silver";
    pub const BRONZE: &str = "Bronze";
    pub const WOOD: &str = "Wood";
}

/// A priced inventory line belonging to one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub ticket_id: TicketId,
    pub event_id: EventId,
    pub ticket_type: String,
    pub ticket_price: i64,
    pub total_quota: i64,
    pub total_remaining: i64,
    pub continent_name: String,
    pub continent_code: String,
    pub country: Location,
    /// Always the parent event's tag.
    pub tag: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Issues a fresh inventory line for `event` with a newly generated id.
    ///
    /// The ticket carries the event's tag, continent and country snapshot,
    /// and the whole quota starts out remaining.
    pub fn issue(
        event: &Event,
        ticket_type: impl Into<String>,
        ticket_price: i64,
        total_quota: i64,
    ) -> Self {
        Self {
            ticket_id: TicketId::new(),
            event_id: event.event_id,
            ticket_type: ticket_type.into(),
            ticket_price,
            total_quota,
            total_remaining: total_quota,
            continent_name: event.continent_name.clone(),
            continent_code: event.continent_code.clone(),
            country: event.country.clone(),
            tag: event.tag.clone(),
            created_at: event.created_at,
            updated_at: event.created_at,
        }
    }
}

/// Share of an online ticket quota assigned to one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryAllocation {
    pub country_number: i64,
    pub percentage: i64,
}

/// Per-tag allocation plan for online sales.
///
/// Identified by `tag` alone; it may exist before, after or without any
/// event using the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineTicketConfig {
    pub tag: String,
    pub total_quota: i64,
    pub country_list: Vec<CountryAllocation>,
    pub created_by: UserId,
    pub updated_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OnlineTicketConfig {
    /// Sum of all allocated percentages, or `None` if it overflows.
    pub fn total_percentage(&self) -> Option<i64> {
        self.country_list
            .iter()
            .try_fold(0i64, |total, c| total.checked_add(c.percentage))
    }
}
