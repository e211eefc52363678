use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Collection domains ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Dining,
    Attraction,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Dining => "dining",
            Domain::Attraction => "attraction",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One search query for one district. Synthesized per run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub text: String,
    pub area: String,
}

// --- Style flags ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DiningStyle {
    Date,
    Business,
    Anniversary,
    Team,
    Family,
    View,
    Meeting,
    Quiet,
    Modern,
    Traditional,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AttractionStyle {
    Activity,
    Hotplace,
    Nature,
    Landmark,
    Healing,
    Culture,
    Photo,
    Shopping,
    Exotic,
    History,
}

// --- Food types ---

/// Cuisine category for a dining place. Exactly one is assigned per place;
/// the first matching category in priority order wins, `Other` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    Japanese,
    Chinese,
    Western,
    SoutheastAsian,
    Cafe,
    Korean,
    Other,
}

impl FoodType {
    /// Korean label, as stored in the food_type column.
    pub fn label(&self) -> &'static str {
        match self {
            FoodType::Japanese => "일식",
            FoodType::Chinese => "중식",
            FoodType::Western => "양식",
            FoodType::SoutheastAsian => "동남아식",
            FoodType::Cafe => "카페",
            FoodType::Korean => "한식",
            FoodType::Other => "기타",
        }
    }
}

impl fmt::Display for FoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// --- Reviews ---

/// A review collected alongside a place. Persisted rows are immutable;
/// duplicate inserts are no-ops at the DB level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedReview {
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl CollectedReview {
    /// Only reviews with more than 10 characters of text are persisted.
    /// Counts Unicode scalar values, not bytes — review text is Korean.
    pub fn qualifies(&self) -> bool {
        self.text.chars().count() > 10
    }
}

// --- Persistence-ready records ---

/// A classified dining place, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningRecord {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub area: String,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub price_level: Option<i32>,
    pub image_url: Option<String>,
    pub styles: BTreeSet<DiningStyle>,
    pub food_type: FoodType,
    pub opening_hours_text: Option<String>,
    pub opening_periods: Option<serde_json::Value>,
    pub phone_number: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub reviews: Vec<CollectedReview>,
    pub created_at: DateTime<Utc>,
}

/// A classified attraction, ready for persistence. `types` carries the
/// provider-assigned type tags used by the admission filter; it is not
/// a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionRecord {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub area: String,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub price_level: Option<i32>,
    pub image_url: Option<String>,
    pub styles: BTreeSet<AttractionStyle>,
    pub types: Vec<String>,
    pub opening_hours_text: Option<String>,
    pub opening_periods: Option<serde_json::Value>,
    pub phone_number: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub reviews: Vec<CollectedReview>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
pub enum PlaceRecord {
    Dining(DiningRecord),
    Attraction(AttractionRecord),
}

impl PlaceRecord {
    pub fn domain(&self) -> Domain {
        match self {
            PlaceRecord::Dining(_) => Domain::Dining,
            PlaceRecord::Attraction(_) => Domain::Attraction,
        }
    }

    pub fn place_id(&self) -> &str {
        match self {
            PlaceRecord::Dining(r) => &r.place_id,
            PlaceRecord::Attraction(r) => &r.place_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlaceRecord::Dining(r) => &r.name,
            PlaceRecord::Attraction(r) => &r.name,
        }
    }

    pub fn area(&self) -> &str {
        match self {
            PlaceRecord::Dining(r) => &r.area,
            PlaceRecord::Attraction(r) => &r.area,
        }
    }

    pub fn reviews(&self) -> &[CollectedReview] {
        match self {
            PlaceRecord::Dining(r) => &r.reviews,
            PlaceRecord::Attraction(r) => &r.reviews,
        }
    }
}

// --- Conflict policy ---

/// Per-deployment choice of what an insert does when the place_id
/// conflict target already holds a row. Fixed at construction, never
/// chosen per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// `ON CONFLICT DO NOTHING` — the existing row wins.
    #[default]
    KeepExisting,
    /// `ON CONFLICT DO UPDATE` overwriting only the volatile fields
    /// (rating, review_count, price_level, image_url).
    RefreshVolatile,
}

impl std::str::FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(ConflictPolicy::KeepExisting),
            "refresh" => Ok(ConflictPolicy::RefreshVolatile),
            other => Err(format!(
                "unknown conflict policy '{other}' (expected 'keep' or 'refresh')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_qualifier_counts_chars_not_bytes() {
        // 11 Korean characters, far more than 10 bytes either way
        let long = CollectedReview {
            text: "정말 맛있는 집이었어요".to_string(),
            created_at: None,
        };
        assert!(long.qualifies());

        // 10 characters exactly — does not qualify
        let short = CollectedReview {
            text: "맛있어요 추천합니다".to_string(),
            created_at: None,
        };
        assert_eq!(short.text.chars().count(), 10);
        assert!(!short.qualifies());
    }

    #[test]
    fn conflict_policy_parses_from_env_values() {
        assert_eq!("keep".parse(), Ok(ConflictPolicy::KeepExisting));
        assert_eq!("refresh".parse(), Ok(ConflictPolicy::RefreshVolatile));
        assert!("merge".parse::<ConflictPolicy>().is_err());
    }

    #[test]
    fn food_type_labels_are_korean() {
        assert_eq!(FoodType::Japanese.label(), "일식");
        assert_eq!(FoodType::Other.label(), "기타");
    }
}
