//! Event provisioning workflows.
//!
//! - [`EventCommandService::create_event`]: validates a new event against
//!   existing events and reference data, stores its tickets and the event,
//!   then announces every ticket through a [`NotificationPublisher`]
//! - [`EventCommandService::create_online_ticket_config`]: stores the
//!   per-country online allocation for a tag
//! - [`EventQueryService::find_events`]: paginated name search
//!
//! Failures carry an [`ErrorKind`] so callers can map them to responses.

pub mod command;
pub mod error;
pub mod notification;
pub mod query;
pub mod request;
pub mod response;

pub use command::{EVENT_CREATED, EventCommandService, ONLINE_TICKET_CONFIG_CREATED};
pub use error::{ErrorKind, Result, ServiceError};
pub use notification::{
    DEFAULT_TICKET_CREATED_TOPIC, InMemoryPublisher, LoggingPublisher, NotificationPublisher,
    PublishedMessage, TicketCreated,
};
pub use query::EventQueryService;
pub use request::{
    CountryLocation, CreateEventRequest, FindEventsRequest, OnlineTicketConfigRequest, TicketSpec,
};
pub use response::{CountryView, EventPage, EventView, PageMetadata};

#[cfg(feature = "kafka")]
pub use notification::KafkaPublisher;
