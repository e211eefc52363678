// Test mocks for the collection pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockProvider (PlaceProvider) — pages keyed by (query, token), with a
//   request log for pagination assertions
// - MemoryStore (PlaceWriter) — stateful in-memory map honoring the
//   conflict policy
//
// Plus helper constructors for wire types and records.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use places_client::{PlaceDetail, PlacesError, SearchPage, SearchedPlace};
use wayfarer_common::{
    AttractionRecord, CollectedReview, ConflictPolicy, DiningRecord, FoodType, PlaceRecord,
};
use wayfarer_store::{StoreError, UpsertOutcome};

use crate::traits::{PlaceProvider, PlaceWriter};

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

type PageKey = (String, Option<String>);

/// Scripted provider. Pages are registered per (query, page token);
/// unregistered requests and registered failures return a provider status
/// error. Every search request is logged.
pub struct MockProvider {
    pages: HashMap<PageKey, SearchPage>,
    failing_pages: HashSet<PageKey>,
    details: HashMap<String, PlaceDetail>,
    failing_details: HashSet<String>,
    pub search_requests: Mutex<Vec<PageKey>>,
}

impl MockProvider {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            failing_pages: HashSet::new(),
            details: HashMap::new(),
            failing_details: HashSet::new(),
            search_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on_page(mut self, query: &str, token: Option<&str>, page: SearchPage) -> Self {
        self.pages
            .insert((query.to_string(), token.map(Into::into)), page);
        self
    }

    pub fn fail_page(mut self, query: &str, token: Option<&str>) -> Self {
        self.failing_pages
            .insert((query.to_string(), token.map(Into::into)));
        self
    }

    pub fn on_detail(mut self, place_id: &str, detail: PlaceDetail) -> Self {
        self.details.insert(place_id.to_string(), detail);
        self
    }

    pub fn fail_detail(mut self, place_id: &str) -> Self {
        self.failing_details.insert(place_id.to_string());
        self
    }
}

#[async_trait]
impl PlaceProvider for MockProvider {
    async fn search_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> places_client::Result<SearchPage> {
        let key = (query.to_string(), page_token.map(Into::into));
        self.search_requests.lock().unwrap().push(key.clone());

        if self.failing_pages.contains(&key) {
            return Err(PlacesError::Status {
                status: "OVER_QUERY_LIMIT".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        self.pages.get(&key).cloned().ok_or(PlacesError::Status {
            status: "INVALID_REQUEST".to_string(),
            message: format!("no page registered for {query:?}"),
        })
    }

    async fn detail(
        &self,
        place_id: &str,
        _fields: &[&str],
    ) -> places_client::Result<PlaceDetail> {
        if self.failing_details.contains(place_id) {
            return Err(PlacesError::Status {
                status: "NOT_FOUND".to_string(),
                message: "scripted failure".to_string(),
            });
        }
        self.details
            .get(place_id)
            .cloned()
            .ok_or(PlacesError::Status {
                status: "NOT_FOUND".to_string(),
                message: format!("no detail registered for {place_id}"),
            })
    }

    fn photo_url(&self, photo_reference: Option<&str>) -> Option<String> {
        photo_reference.map(|r| format!("https://photos.test/{r}"))
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-memory PlaceWriter keyed by place_id, honoring the conflict policy.
pub struct MemoryStore {
    policy: ConflictPolicy,
    failing: HashSet<String>,
    pub records: Mutex<HashMap<String, PlaceRecord>>,
    pub reviews: Mutex<HashMap<String, Vec<CollectedReview>>>,
}

impl MemoryStore {
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            policy,
            failing: HashSet::new(),
            records: Mutex::new(HashMap::new()),
            reviews: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail_place(mut self, place_id: &str) -> Self {
        self.failing.insert(place_id.to_string());
        self
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PlaceWriter for MemoryStore {
    async fn upsert(&self, record: &PlaceRecord) -> Result<UpsertOutcome, StoreError> {
        let place_id = record.place_id().to_string();
        if self.failing.contains(&place_id) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }

        let outcome = {
            let mut records = self.records.lock().unwrap();
            match records.get_mut(&place_id) {
                Some(existing) => {
                    if self.policy == ConflictPolicy::RefreshVolatile {
                        refresh_volatile(existing, record);
                    }
                    UpsertOutcome::AlreadyPresent
                }
                None => {
                    records.insert(place_id.clone(), record.clone());
                    UpsertOutcome::Inserted
                }
            }
        };

        let mut reviews = self.reviews.lock().unwrap();
        let stored = reviews.entry(place_id).or_default();
        for review in record.reviews().iter().filter(|r| r.qualifies()) {
            if !stored.iter().any(|s| s.text == review.text) {
                stored.push(review.clone());
            }
        }

        Ok(outcome)
    }
}

fn refresh_volatile(existing: &mut PlaceRecord, incoming: &PlaceRecord) {
    match (existing, incoming) {
        (PlaceRecord::Dining(old), PlaceRecord::Dining(new)) => {
            old.rating = new.rating;
            old.review_count = new.review_count;
            old.price_level = new.price_level;
            old.image_url = new.image_url.clone();
        }
        (PlaceRecord::Attraction(old), PlaceRecord::Attraction(new)) => {
            old.rating = new.rating;
            old.review_count = new.review_count;
            old.price_level = new.price_level;
            old.image_url = new.image_url.clone();
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Helper constructors
// ---------------------------------------------------------------------------

pub fn searched_place(place_id: &str, name: &str) -> SearchedPlace {
    SearchedPlace {
        place_id: place_id.to_string(),
        name: name.to_string(),
        formatted_address: None,
        types: Vec::new(),
        rating: None,
        user_ratings_total: None,
        price_level: None,
        photos: Vec::new(),
    }
}

pub fn page(results: Vec<SearchedPlace>, next_page_token: Option<&str>) -> SearchPage {
    SearchPage {
        results,
        next_page_token: next_page_token.map(Into::into),
    }
}

/// A detail that passes the dining quality gate: price tier 2 and a photo.
pub fn dining_detail(name: &str) -> PlaceDetail {
    PlaceDetail {
        name: Some(name.to_string()),
        formatted_address: Some("서울 강남구 테헤란로 1".to_string()),
        rating: Some(4.4),
        user_ratings_total: Some(120),
        price_level: Some(2),
        photos: vec![places_client::Photo {
            photo_reference: Some("ref-1".to_string()),
        }],
        ..Default::default()
    }
}

pub fn dining_record(place_id: &str, name: &str) -> PlaceRecord {
    PlaceRecord::Dining(DiningRecord {
        place_id: place_id.to_string(),
        name: name.to_string(),
        address: Some("서울 강남구 테헤란로 1".to_string()),
        area: "강남".to_string(),
        rating: Some(4.4),
        review_count: Some(120),
        price_level: Some(2),
        image_url: Some("https://photos.test/ref-1".to_string()),
        styles: Default::default(),
        food_type: FoodType::Other,
        opening_hours_text: None,
        opening_periods: None,
        phone_number: None,
        lat: None,
        lng: None,
        reviews: Vec::new(),
        created_at: Utc::now(),
    })
}

pub fn attraction_record(place_id: &str, name: &str) -> PlaceRecord {
    PlaceRecord::Attraction(AttractionRecord {
        place_id: place_id.to_string(),
        name: name.to_string(),
        address: Some("서울 종로구 사직로 161".to_string()),
        area: "종로".to_string(),
        rating: Some(4.7),
        review_count: Some(5000),
        price_level: None,
        image_url: Some("https://photos.test/ref-2".to_string()),
        styles: Default::default(),
        types: vec!["tourist_attraction".to_string()],
        opening_hours_text: None,
        opening_periods: None,
        phone_number: None,
        lat: None,
        lng: None,
        reviews: Vec::new(),
        created_at: Utc::now(),
    })
}
