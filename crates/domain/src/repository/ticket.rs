use document_store::{DocumentStore, Filter, Pending};

use super::{collections, encode};
use crate::ticket::{OnlineTicketConfig, Ticket};

/// Access to the ticket inventory and online sales configuration collections.
#[derive(Debug, Clone)]
pub struct TicketRepository<S> {
    store: S,
}

impl<S> TicketRepository<S>
where
    S: DocumentStore + Clone + 'static,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Inserts all tickets in a single store operation.
    pub fn insert_many(&self, tickets: &[Ticket]) -> Pending<()> {
        let documents = match tickets
            .iter()
            .map(encode)
            .collect::<document_store::Result<Vec<_>>>()
        {
            Ok(documents) => documents,
            Err(e) => return Pending::ready(Err(e)),
        };
        let store = self.store.clone();
        let count = tickets.len();

        Pending::spawn(async move {
            tracing::debug!(count, "inserting tickets");
            store.insert_many(collections::TICKET, documents).await
        })
    }

    /// Creates or replaces the configuration stored under the config's tag.
    pub fn upsert_online_config(&self, config: &OnlineTicketConfig) -> Pending<()> {
        let document = match encode(config) {
            Ok(document) => document,
            Err(e) => return Pending::ready(Err(e)),
        };
        let filter = Filter::by("tag", config.tag.as_str());
        let store = self.store.clone();

        Pending::spawn(async move {
            store
                .upsert_one(collections::ONLINE_TICKET_CONFIG, &filter, document)
                .await
        })
    }
}
