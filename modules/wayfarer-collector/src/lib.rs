pub mod classify;
pub mod collector;
pub mod dedupe;
pub mod profiles;
pub mod quality;
pub mod search;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use collector::{CollectReport, CollectStats, Collector, PlaceOutcome};
pub use dedupe::SearchHit;
pub use profiles::DomainProfile;
pub use traits::{PlaceProvider, PlaceWriter};
