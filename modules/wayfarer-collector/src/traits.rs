// Trait abstractions for the pipeline's two external collaborators.
//
// PlaceProvider — one search page, one detail fetch, photo URL derivation.
// PlaceWriter — idempotent place persistence.
//
// These enable deterministic testing with MockProvider and MemoryStore:
// no network, no database.

use async_trait::async_trait;

use places_client::{PlaceDetail, PlacesClient, SearchPage};
use wayfarer_common::PlaceRecord;
use wayfarer_store::{PlaceStore, StoreError, UpsertOutcome};

#[async_trait]
pub trait PlaceProvider: Send + Sync {
    /// Fetch one page of text search results for a query.
    async fn search_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> places_client::Result<SearchPage>;

    /// Fetch extended attributes for a place, restricted to `fields`.
    async fn detail(&self, place_id: &str, fields: &[&str])
        -> places_client::Result<PlaceDetail>;

    /// Derive a photo URL from a photo reference.
    fn photo_url(&self, photo_reference: Option<&str>) -> Option<String>;
}

#[async_trait]
impl PlaceProvider for PlacesClient {
    async fn search_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> places_client::Result<SearchPage> {
        self.text_search(query, page_token).await
    }

    async fn detail(
        &self,
        place_id: &str,
        fields: &[&str],
    ) -> places_client::Result<PlaceDetail> {
        self.place_details(place_id, fields).await
    }

    fn photo_url(&self, photo_reference: Option<&str>) -> Option<String> {
        PlacesClient::photo_url(self, photo_reference)
    }
}

#[async_trait]
pub trait PlaceWriter: Send + Sync {
    async fn upsert(&self, record: &PlaceRecord) -> Result<UpsertOutcome, StoreError>;
}

#[async_trait]
impl PlaceWriter for PlaceStore {
    async fn upsert(&self, record: &PlaceRecord) -> Result<UpsertOutcome, StoreError> {
        PlaceStore::upsert(self, record).await
    }
}
