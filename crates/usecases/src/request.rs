//! Workflow inputs.
//!
//! Field names follow the JSON bodies accepted by the HTTP layer. The
//! requesting user is not part of the body; callers fill `user_id` from the
//! authenticated identity before running a workflow.

use common::UserId;
use domain::CountryAllocation;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Venue of a new event. `id` selects the country record; `name` is
/// informational, the stored snapshot uses the resolved country's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryLocation {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    pub city: String,
    pub place: String,
}

/// One ticket type to issue for a new event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketSpec {
    pub ticket_type: String,
    pub ticket_price: i64,
    pub total_quota: i64,
    /// Accepted for compatibility; tickets always take the event's tag.
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    /// `YYYY-MM-DD HH:MM`, interpreted as UTC.
    pub date_time: String,
    pub continent_code: String,
    pub continent_name: String,
    pub country: CountryLocation,
    pub description: String,
    pub tag: String,
    pub tickets: Vec<TicketSpec>,
    #[serde(default)]
    pub user_id: UserId,
}

impl CreateEventRequest {
    /// Checks required fields. Never touches storage.
    pub fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require("dateTime", &self.date_time)?;
        require("continentCode", &self.continent_code)?;
        require("continentName", &self.continent_name)?;
        require("country.city", &self.country.city)?;
        require("country.place", &self.country.place)?;
        require("description", &self.description)?;
        require("tag", &self.tag)?;
        require("userId", self.user_id.as_str())?;

        if self.tickets.is_empty() {
            return Err(invalid("at least one ticket is required"));
        }
        for (i, ticket) in self.tickets.iter().enumerate() {
            if ticket.ticket_type.trim().is_empty() {
                return Err(invalid(format!("tickets[{i}].ticketType is required")));
            }
            if ticket.total_quota <= 0 {
                return Err(invalid(format!("tickets[{i}].totalQuota must be positive")));
            }
            if ticket.ticket_price < 0 {
                return Err(invalid(format!(
                    "tickets[{i}].ticketPrice must not be negative"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineTicketConfigRequest {
    pub tag: String,
    pub total_quota: i64,
    #[serde(default)]
    pub country_list: Vec<CountryAllocation>,
    #[serde(default)]
    pub user_id: UserId,
}

impl OnlineTicketConfigRequest {
    /// Checks required fields and that each percentage lies in `0..=100`.
    /// The percentage total is a business rule and is checked by the
    /// workflow itself, after the tag ownership check.
    pub fn validate(&self) -> Result<()> {
        require("tag", &self.tag)?;
        require("userId", self.user_id.as_str())?;
        if self.total_quota <= 0 {
            return Err(invalid("totalQuota must be positive"));
        }
        for (i, allocation) in self.country_list.iter().enumerate() {
            if !(0..=100).contains(&allocation.percentage) {
                return Err(invalid(format!(
                    "countryList[{i}].percentage must be between 0 and 100"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindEventsRequest {
    pub page: u64,
    pub size: u64,
    #[serde(default)]
    pub search: String,
}

impl FindEventsRequest {
    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(invalid("page must be at least 1"));
        }
        if self.size < 1 {
            return Err(invalid("size must be at least 1"));
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ServiceError {
    ServiceError::Validation(message.into())
}
