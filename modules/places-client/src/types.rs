use serde::{Deserialize, Serialize};

/// Wire response for a text search call.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<SearchedPlace>,
    pub next_page_token: Option<String>,
    pub error_message: Option<String>,
}

/// One page of search results after status checking.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub results: Vec<SearchedPlace>,
    pub next_page_token: Option<String>,
}

/// A single result item from a text search. Every field the provider
/// may omit is an explicit Option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchedPlace {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
    pub price_level: Option<i32>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl SearchedPlace {
    /// Photo reference of the first photo, if any.
    pub fn photo_reference(&self) -> Option<&str> {
        self.photos.first().and_then(|p| p.photo_reference.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub photo_reference: Option<String>,
}

/// Wire response for a place details call.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResponse {
    pub status: String,
    pub result: Option<PlaceDetail>,
    pub error_message: Option<String>,
}

/// Extended attributes for one place. Which fields are populated depends
/// on the field subset requested; everything is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaceDetail {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
    pub price_level: Option<i32>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    pub opening_hours: Option<OpeningHours>,
    pub formatted_phone_number: Option<String>,
    pub geometry: Option<Geometry>,
}

impl PlaceDetail {
    pub fn photo_reference(&self) -> Option<&str> {
        self.photos.first().and_then(|p| p.photo_reference.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub text: Option<String>,
    /// Unix timestamp (seconds) of the review.
    pub time: Option<i64>,
    pub rating: Option<f64>,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHours {
    pub weekday_text: Option<Vec<String>>,
    /// Raw periods payload, persisted as-is.
    pub periods: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: Option<LatLng>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}
