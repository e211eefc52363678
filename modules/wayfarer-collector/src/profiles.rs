//! Per-domain collection profiles: compile-time configuration data for
//! query construction, detail field subsets, and artifact naming.

use wayfarer_common::Domain;

/// The 25 Seoul districts searched by every run.
pub const SEOUL_DISTRICTS: &[&str] = &[
    "강남", "강동", "강북", "강서", "관악", "광진", "구로", "금천", "노원",
    "도봉", "동대문", "동작", "마포", "서대문", "서초", "성동", "성북",
    "송파", "양천", "영등포", "용산", "은평", "종로", "중구", "중랑",
];

/// Style phrases crossed with districts to build dining queries.
pub const DINING_QUERY_STYLES: &[&str] = &[
    "데이트용",
    "비즈니스 미팅",
    "기념일",
    "단체회식",
    "가족모임",
    "뷰 맛집",
    "상견례",
    "조용한 분위기",
    "모던한",
    "전통적인",
];

/// Detail field subset per domain — the cost-control contract with the
/// provider. Dining needs hours/phone/geometry; attractions need types
/// for the admission re-check.
pub const DINING_DETAIL_FIELDS: &[&str] = &[
    "name",
    "rating",
    "formatted_address",
    "user_ratings_total",
    "price_level",
    "reviews",
    "photos",
    "opening_hours",
    "formatted_phone_number",
    "geometry",
];

pub const ATTRACTION_DETAIL_FIELDS: &[&str] = &[
    "name",
    "rating",
    "formatted_address",
    "user_ratings_total",
    "price_level",
    "reviews",
    "photos",
    "types",
    "opening_hours",
    "geometry",
];

#[derive(Debug, Clone)]
pub struct DomainProfile {
    pub domain: Domain,
    pub areas: Vec<&'static str>,
    /// Empty for domains whose queries are areas alone.
    pub styles: &'static [&'static str],
    pub detail_fields: &'static [&'static str],
    pub artifact_name: &'static str,
}

pub fn profile(domain: Domain) -> DomainProfile {
    match domain {
        Domain::Dining => DomainProfile {
            domain,
            areas: SEOUL_DISTRICTS.to_vec(),
            styles: DINING_QUERY_STYLES,
            detail_fields: DINING_DETAIL_FIELDS,
            artifact_name: "places_data.json",
        },
        Domain::Attraction => DomainProfile {
            domain,
            areas: SEOUL_DISTRICTS.to_vec(),
            styles: &[],
            detail_fields: ATTRACTION_DETAIL_FIELDS,
            artifact_name: "tourist_spots_data.json",
        },
    }
}
