//! Document-store driver contract for the event provisioning service.
//!
//! - [`DocumentStore`]: find / insert / upsert over JSON documents grouped in collections
//! - [`Pending`]: the one-shot handle every repository call hands back
//! - [`InMemoryDocumentStore`] and [`PostgresDocumentStore`] drivers

pub mod error;
pub mod filter;
pub mod memory;
pub mod pending;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use filter::{Condition, Filter, Page, PageRequest, Sort, SortDirection};
pub use memory::{InMemoryDocumentStore, StoreCall, StoreOperation};
pub use pending::Pending;
pub use postgres::PostgresDocumentStore;
pub use store::{Document, DocumentStore};
