use document_store::{DocumentStore, Filter, Page, PageRequest, Pending, Sort};

use super::{collections, decode, decode_optional, encode};
use crate::event::Event;

/// Search parameters for [`EventRepository::search`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSearch {
    /// Case-insensitive substring of the event name. Empty matches all.
    pub search: String,
    pub page: PageRequest,
}

/// Access to the event collection.
#[derive(Debug, Clone)]
pub struct EventRepository<S> {
    store: S,
}

impl<S> EventRepository<S>
where
    S: DocumentStore + Clone + 'static,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Looks up the event with exactly this name.
    pub fn find_by_name(&self, name: &str) -> Pending<Option<Event>> {
        self.find_one(Filter::by("name", name))
    }

    /// Looks up the first event created under this tag.
    pub fn find_by_tag(&self, tag: &str) -> Pending<Option<Event>> {
        self.find_one(Filter::by("tag", tag))
    }

    /// Inserts a new event record.
    pub fn insert(&self, event: &Event) -> Pending<()> {
        let document = match encode(event) {
            Ok(document) => document,
            Err(e) => return Pending::ready(Err(e)),
        };
        let store = self.store.clone();

        Pending::spawn(async move { store.insert_one(collections::EVENT, document).await })
    }

    /// Returns one page of events whose name contains the search string,
    /// ordered by name, together with the total number of matches.
    pub fn search(&self, query: EventSearch) -> Pending<Page<Event>> {
        let store = self.store.clone();

        Pending::spawn(async move {
            let filter = Filter::new().contains_ignore_case("name", query.search);
            let page = store
                .find_many(
                    collections::EVENT,
                    &filter,
                    Some(&Sort::ascending("name")),
                    query.page,
                )
                .await?;
            page.try_map(|d| decode(collections::EVENT, d))
        })
    }

    fn find_one(&self, filter: Filter) -> Pending<Option<Event>> {
        let store = self.store.clone();

        Pending::spawn(async move {
            let document = store.find_one(collections::EVENT, &filter).await?;
            decode_optional(collections::EVENT, document)
        })
    }
}
