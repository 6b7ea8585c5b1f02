use document_store::{DocumentStore, Filter, Pending};

use super::{collections, decode_optional};
use crate::reference::{Continent, Country};

/// Read-only access to country and continent records.
#[derive(Debug, Clone)]
pub struct ReferenceDataRepository<S> {
    store: S,
}

impl<S> ReferenceDataRepository<S>
where
    S: DocumentStore + Clone + 'static,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn find_country_by_id(&self, id: i64) -> Pending<Option<Country>> {
        let store = self.store.clone();

        Pending::spawn(async move {
            let document = store
                .find_one(collections::COUNTRY, &Filter::by("id", id))
                .await?;
            decode_optional(collections::COUNTRY, document)
        })
    }

    pub fn find_continent_by_code(&self, code: &str) -> Pending<Option<Continent>> {
        let filter = Filter::by("code", code);
        let store = self.store.clone();

        Pending::spawn(async move {
            let document = store.find_one(collections::CONTINENT, &filter).await?;
            decode_optional(collections::CONTINENT, document)
        })
    }
}
