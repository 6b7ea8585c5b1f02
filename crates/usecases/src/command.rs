//! Write workflows: event creation and online ticket configuration.

use std::time::Instant;

use chrono::{DateTime, NaiveDateTime, Utc};
use common::EventId;
use document_store::DocumentStore;
use domain::{
    Event, EventRepository, Location, OnlineTicketConfig, ReferenceDataRepository, Ticket,
    TicketRepository,
};

use crate::error::{Result, ServiceError};
use crate::notification::{DEFAULT_TICKET_CREATED_TOPIC, NotificationPublisher, TicketCreated};
use crate::request::{CreateEventRequest, OnlineTicketConfigRequest};

/// Returned by [`EventCommandService::create_event`] on success.
pub const EVENT_CREATED: &str = "Success create event";

/// Returned by [`EventCommandService::create_online_ticket_config`] on success.
pub const ONLINE_TICKET_CONFIG_CREATED: &str = "Success create online ticket config";

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Runs the event write workflows.
///
/// Every step awaits its repository call before the next one starts, and
/// the first failing step ends the workflow. The two collections written by
/// [`create_event`](Self::create_event) are not updated atomically.
pub struct EventCommandService<S, P> {
    events: EventRepository<S>,
    tickets: TicketRepository<S>,
    reference: ReferenceDataRepository<S>,
    publisher: P,
    ticket_created_topic: String,
}

impl<S, P> EventCommandService<S, P>
where
    S: DocumentStore + Clone + 'static,
    P: NotificationPublisher,
{
    /// Creates a new command service publishing to the default topic.
    pub fn new(store: S, publisher: P) -> Self {
        Self {
            events: EventRepository::new(store.clone()),
            tickets: TicketRepository::new(store.clone()),
            reference: ReferenceDataRepository::new(store),
            publisher,
            ticket_created_topic: DEFAULT_TICKET_CREATED_TOPIC.to_string(),
        }
    }

    /// Sets the topic "ticket created" notifications are published to.
    pub fn with_ticket_created_topic(mut self, topic: impl Into<String>) -> Self {
        self.ticket_created_topic = topic.into();
        self
    }

    pub fn ticket_created_topic(&self) -> &str {
        &self.ticket_created_topic
    }

    /// Creates an event together with its ticket inventory.
    ///
    /// Checks run in a fixed order: name uniqueness, tag ownership, date
    /// format, continent, country. Tickets are stored before the event. If
    /// storing the event fails, the stored tickets stay behind and their ids
    /// are logged.
    #[tracing::instrument(
        skip(self, request),
        fields(event_name = %request.name, tag = %request.tag, user_id = %request.user_id)
    )]
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<&'static str> {
        let started = Instant::now();
        let result = self.run_create_event(request).await;
        metrics::histogram!("event_creation_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(_) => metrics::counter!("events_created_total").increment(1),
            Err(e) => {
                metrics::counter!("event_creation_failures_total", "kind" => e.kind().as_str())
                    .increment(1);
                tracing::warn!(error = %e, "event creation failed");
            }
        }
        result
    }

    async fn run_create_event(&self, request: CreateEventRequest) -> Result<&'static str> {
        request.validate()?;

        if self.events.find_by_name(&request.name).await?.is_some() {
            return Err(ServiceError::EventAlreadyExists(request.name));
        }

        let tagged = self.events.find_by_tag(&request.tag).await?;
        if tagged.is_some_and(|existing| !existing.tag_usable_by(&request.user_id)) {
            return Err(ServiceError::TagOwnedByAnotherUser(request.tag));
        }

        let date_time = parse_date_time(&request.date_time)?;

        let continent = self
            .reference
            .find_continent_by_code(&request.continent_code)
            .await?
            .ok_or_else(|| ServiceError::ContinentNotFound(request.continent_code.clone()))?;

        let country = self
            .reference
            .find_country_by_id(request.country.id)
            .await?
            .ok_or(ServiceError::CountryNotFound(request.country.id))?;

        let now = Utc::now();
        let mut event = Event {
            event_id: EventId::new(),
            name: request.name,
            date_time,
            continent_code: continent.code,
            continent_name: continent.name,
            country: Location {
                name: country.name,
                code: country.code,
                city: request.country.city,
                place: request.country.place,
            },
            description: request.description,
            tag: request.tag,
            ticket_ids: Vec::with_capacity(request.tickets.len()),
            created_by: request.user_id.clone(),
            updated_by: request.user_id,
            created_at: now,
            updated_at: now,
        };

        let tickets: Vec<Ticket> = request
            .tickets
            .iter()
            .map(|spec| {
                Ticket::issue(
                    &event,
                    spec.ticket_type.as_str(),
                    spec.ticket_price,
                    spec.total_quota,
                )
            })
            .collect();
        event.ticket_ids = tickets.iter().map(|t| t.ticket_id).collect();

        self.tickets.insert_many(&tickets).await?;

        if let Err(e) = self.events.insert(&event).await {
            tracing::error!(
                event_id = %event.event_id,
                orphaned_tickets = ?event.ticket_ids,
                error = %e,
                "event insert failed after its tickets were stored"
            );
            return Err(e.into());
        }

        self.publish_ticket_created(&event);

        tracing::info!(event_id = %event.event_id, tickets = tickets.len(), "event created");
        Ok(EVENT_CREATED)
    }

    /// Creates or replaces the online ticket allocation for a tag.
    #[tracing::instrument(skip(self, request), fields(tag = %request.tag, user_id = %request.user_id))]
    pub async fn create_online_ticket_config(
        &self,
        request: OnlineTicketConfigRequest,
    ) -> Result<&'static str> {
        request.validate()?;

        let tagged = self.events.find_by_tag(&request.tag).await?;
        if tagged.is_some_and(|existing| !existing.tag_usable_by(&request.user_id)) {
            return Err(ServiceError::TagOwnedByAnotherUser(request.tag));
        }

        let now = Utc::now();
        let config = OnlineTicketConfig {
            tag: request.tag,
            total_quota: request.total_quota,
            country_list: request.country_list,
            created_by: request.user_id.clone(),
            updated_by: request.user_id,
            created_at: now,
            updated_at: now,
        };

        match config.total_percentage() {
            Some(100) => {}
            Some(total) => return Err(ServiceError::InvalidPercentageTotal(total)),
            None => {
                return Err(ServiceError::Validation(
                    "country percentages overflow".to_string(),
                ));
            }
        }

        self.tickets.upsert_online_config(&config).await?;

        metrics::counter!("online_ticket_configs_upserted_total").increment(1);
        tracing::info!(countries = config.country_list.len(), "online ticket config stored");
        Ok(ONLINE_TICKET_CONFIG_CREATED)
    }

    fn publish_ticket_created(&self, event: &Event) {
        for &ticket_id in &event.ticket_ids {
            let message = TicketCreated {
                ticket_id,
                event_id: event.event_id,
            };
            match serde_json::to_vec(&message) {
                Ok(payload) => {
                    self.publisher
                        .publish(&self.ticket_created_topic, payload, Some(message.key()));
                    metrics::counter!("ticket_notifications_published_total").increment(1);
                }
                Err(e) => {
                    tracing::error!(%ticket_id, error = %e, "failed to encode ticket notification")
                }
            }
        }
    }
}

/// Parses `YYYY-MM-DD HH:MM` as a UTC timestamp.
fn parse_date_time(input: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(input, DATE_TIME_FORMAT)
        .map(|dt| dt.and_utc())
        .map_err(|_| ServiceError::InvalidDateTime(input.to_string()))
}
