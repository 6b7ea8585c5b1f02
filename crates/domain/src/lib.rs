//! Records and repositories of the event provisioning service.
//!
//! - [`Event`], [`Ticket`] and [`OnlineTicketConfig`]: the records written by the workflows
//! - [`Country`] and [`Continent`]: read-only reference data
//! - [`EventRepository`], [`TicketRepository`], [`ReferenceDataRepository`]: typed access to
//!   the document store, every call returning a [`document_store::Pending`] handle

pub mod event;
pub mod reference;
pub mod repository;
pub mod ticket;

pub use event::{Event, Location};
pub use reference::{Continent, Country};
pub use repository::{
    EventRepository, EventSearch, ReferenceDataRepository, TicketRepository, collections,
};
pub use ticket::{CountryAllocation, OnlineTicketConfig, Ticket, ticket_type};
