use std::fmt;

use wayfarer_common::PlaceRecord;

use crate::classify;

/// Why a place was dropped by the content-quality filter. Not an error —
/// counted, logged, and otherwise silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoPriceTier,
    NoImage,
    DisallowedType,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoPriceTier => write!(f, "missing or invalid price tier"),
            SkipReason::NoImage => write!(f, "no image"),
            SkipReason::DisallowedType => write!(f, "type not admitted"),
        }
    }
}

/// Pre-persistence guard. Dining places need a real price tier and an
/// image; attractions must pass the type admission rule again on the
/// detail-fetched tags (the search-phase filter only saw search tags).
pub fn check(record: &PlaceRecord) -> Option<SkipReason> {
    match record {
        PlaceRecord::Dining(r) => {
            if !r.price_level.is_some_and(|p| p >= 1) {
                return Some(SkipReason::NoPriceTier);
            }
            if r.image_url.is_none() {
                return Some(SkipReason::NoImage);
            }
            None
        }
        PlaceRecord::Attraction(r) => {
            if !classify::admit_attraction(&r.types) {
                return Some(SkipReason::DisallowedType);
            }
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{attraction_record, dining_record};

    #[test]
    fn dining_without_price_tier_is_skipped() {
        let mut record = dining_record("p1", "식당");
        if let PlaceRecord::Dining(r) = &mut record {
            r.price_level = None;
        }
        assert_eq!(check(&record), Some(SkipReason::NoPriceTier));
    }

    #[test]
    fn dining_with_zero_price_tier_is_skipped() {
        let mut record = dining_record("p1", "식당");
        if let PlaceRecord::Dining(r) = &mut record {
            r.price_level = Some(0);
        }
        assert_eq!(check(&record), Some(SkipReason::NoPriceTier));
    }

    #[test]
    fn dining_without_image_is_skipped() {
        let mut record = dining_record("p1", "식당");
        if let PlaceRecord::Dining(r) = &mut record {
            r.image_url = None;
        }
        assert_eq!(check(&record), Some(SkipReason::NoImage));
    }

    #[test]
    fn complete_dining_record_passes() {
        assert_eq!(check(&dining_record("p1", "식당")), None);
    }

    #[test]
    fn attraction_with_denied_type_is_skipped() {
        let mut record = attraction_record("p1", "명소");
        if let PlaceRecord::Attraction(r) = &mut record {
            r.types.push("restaurant".to_string());
        }
        assert_eq!(check(&record), Some(SkipReason::DisallowedType));
    }
}
