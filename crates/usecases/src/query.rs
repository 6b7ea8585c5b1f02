//! Read workflow: paginated event search.

use document_store::{DocumentStore, PageRequest};
use domain::{EventRepository, EventSearch};

use crate::error::{Result, ServiceError};
use crate::request::FindEventsRequest;
use crate::response::{EventPage, EventView, PageMetadata};

/// Serves event searches.
pub struct EventQueryService<S> {
    events: EventRepository<S>,
}

impl<S> EventQueryService<S>
where
    S: DocumentStore + Clone + 'static,
{
    pub fn new(store: S) -> Self {
        Self {
            events: EventRepository::new(store),
        }
    }

    /// Returns one page of events whose name contains `search`, ignoring
    /// case, ordered by name. An empty page is reported as not found.
    #[tracing::instrument(skip(self), fields(page = request.page, size = request.size))]
    pub async fn find_events(&self, request: FindEventsRequest) -> Result<EventPage> {
        request.validate()?;
        metrics::counter!("event_searches_total").increment(1);

        let page = self
            .events
            .search(EventSearch {
                search: request.search,
                page: PageRequest::new(request.page, request.size),
            })
            .await?;

        if page.is_empty() {
            tracing::debug!(total = page.total, "no events on requested page");
            return Err(ServiceError::EventsNotFound);
        }

        let count = u64::try_from(page.items.len()).unwrap_or(u64::MAX);
        Ok(EventPage {
            meta_data: PageMetadata::new(request.page, request.size, count, page.total),
            collection_data: page.items.into_iter().map(EventView::from).collect(),
        })
    }
}
