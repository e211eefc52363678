pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{
    AttractionRecord, AttractionStyle, CollectedReview, ConflictPolicy, DiningRecord, DiningStyle,
    Domain, FoodType, PlaceRecord, Query,
};
