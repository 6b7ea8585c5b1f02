//! Shared fixtures for the workflow integration tests.

#![allow(dead_code)]

use common::UserId;
use document_store::InMemoryDocumentStore;
use domain::{CountryAllocation, Event, Ticket, collections};
use serde_json::json;
use usecases::{
    CountryLocation, CreateEventRequest, EventCommandService, EventQueryService,
    InMemoryPublisher, OnlineTicketConfigRequest, TicketSpec,
};

pub const ORGANIZER: &str = "organizer-1";
pub const OTHER_ORGANIZER: &str = "organizer-2";
pub const INDONESIA: i64 = 62;

pub struct TestHarness {
    pub commands: EventCommandService<InMemoryDocumentStore, InMemoryPublisher>,
    pub queries: EventQueryService<InMemoryDocumentStore>,
    pub store: InMemoryDocumentStore,
    pub publisher: InMemoryPublisher,
}

impl TestHarness {
    /// A harness whose store holds the reference data only.
    pub async fn new() -> Self {
        let h = Self::empty();
        h.store
            .seed(
                collections::CONTINENT,
                [
                    json!({"code": "AS", "name": "Asia"}),
                    json!({"code": "EU", "name": "Europe"}),
                ],
            )
            .await;
        h.store
            .seed(
                collections::COUNTRY,
                [
                    json!({
                        "id": INDONESIA, "code": "ID", "name": "Indonesia", "iso3": "IDN",
                        "number": 360, "continentCode": "AS", "continentName": "Asia"
                    }),
                    json!({
                        "id": 60, "code": "MY", "name": "Malaysia", "iso3": "MYS",
                        "number": 458, "continentCode": "AS", "continentName": "Asia"
                    }),
                ],
            )
            .await;
        h
    }

    /// A harness with a completely empty store.
    pub fn empty() -> Self {
        let store = InMemoryDocumentStore::new();
        let publisher = InMemoryPublisher::new();
        Self {
            commands: EventCommandService::new(store.clone(), publisher.clone()),
            queries: EventQueryService::new(store.clone()),
            store,
            publisher,
        }
    }

    pub async fn stored_events(&self) -> Vec<Event> {
        self.store
            .documents(collections::EVENT)
            .await
            .into_iter()
            .map(|d| serde_json::from_value(d).unwrap())
            .collect()
    }

    pub async fn stored_tickets(&self) -> Vec<Ticket> {
        self.store
            .documents(collections::TICKET)
            .await
            .into_iter()
            .map(|d| serde_json::from_value(d).unwrap())
            .collect()
    }

    /// Creates an event with a single ticket type, panicking on failure.
    pub async fn create_event(&self, name: &str, tag: &str) {
        self.commands
            .create_event(create_request(name, tag, ORGANIZER))
            .await
            .unwrap();
    }
}

pub fn create_request(name: &str, tag: &str, user: &str) -> CreateEventRequest {
    CreateEventRequest {
        name: name.to_string(),
        date_time: "2024-09-14 19:30".to_string(),
        continent_code: "AS".to_string(),
        continent_name: "asia".to_string(),
        country: CountryLocation {
            id: INDONESIA,
            name: "indonesia".to_string(),
            city: "Jakarta".to_string(),
            place: "GBK Stadium".to_string(),
        },
        description: "Open air concert".to_string(),
        tag: tag.to_string(),
        tickets: vec![ticket("Gold", 1_500_000, 500)],
        user_id: UserId::new(user),
    }
}

pub fn ticket(ticket_type: &str, ticket_price: i64, total_quota: i64) -> TicketSpec {
    TicketSpec {
        ticket_type: ticket_type.to_string(),
        ticket_price,
        total_quota,
        tag: String::new(),
    }
}

pub fn config_request(
    tag: &str,
    user: &str,
    total_quota: i64,
    percentages: &[i64],
) -> OnlineTicketConfigRequest {
    OnlineTicketConfigRequest {
        tag: tag.to_string(),
        total_quota,
        country_list: percentages
            .iter()
            .zip([360, 458, 702, 764])
            .map(|(&percentage, country_number)| CountryAllocation {
                country_number,
                percentage,
            })
            .collect(),
        user_id: UserId::new(user),
    }
}
