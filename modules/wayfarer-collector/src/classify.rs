//! Keyword-based classification.
//!
//! Declarative rule tables, pure functions of the input text: style flags
//! are independent regex tests, food type is a priority-ordered first-match
//! keyword scan, attraction admission is an allow/deny intersection on the
//! provider's type tags.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use places_client::Review;
use wayfarer_common::{AttractionStyle, DiningStyle, FoodType};

static DINING_STYLE_RULES: LazyLock<Vec<(DiningStyle, Regex)>> = LazyLock::new(|| {
    [
        (DiningStyle::Date, "데이트|감성|로맨틱"),
        (DiningStyle::Business, "비즈니스|접대|코스요리|정식"),
        (DiningStyle::Anniversary, "기념일|분위기 좋은|로맨틱"),
        (DiningStyle::Team, "단체|회식|모임|넓은|룸"),
        (DiningStyle::Family, "가족|어르신|아이와|가정식|한정식"),
        (DiningStyle::View, "뷰|전망|한강|야경|루프탑"),
        (DiningStyle::Meeting, "상견례"),
        (DiningStyle::Quiet, "조용|은은|아늑|한적"),
        (DiningStyle::Modern, "모던|퓨전|깔끔|인테리어"),
        (DiningStyle::Traditional, "전통|한정식|한옥|정갈"),
    ]
    .into_iter()
    .map(|(style, pattern)| (style, Regex::new(pattern).unwrap()))
    .collect()
});

static ATTRACTION_STYLE_RULES: LazyLock<Vec<(AttractionStyle, Regex)>> = LazyLock::new(|| {
    [
        (AttractionStyle::Activity, "액티비티|체험|놀이"),
        (AttractionStyle::Hotplace, "핫플|인기|줄서"),
        (AttractionStyle::Nature, "자연|공원|숲|산책"),
        (AttractionStyle::Landmark, "랜드마크|타워|명소"),
        (AttractionStyle::Healing, "힐링|휴식|여유"),
        (AttractionStyle::Culture, "문화|박물관|미술관|공연"),
        (AttractionStyle::Photo, "사진|포토|인생샷"),
        (AttractionStyle::Shopping, "쇼핑|시장|몰"),
        (AttractionStyle::Exotic, "이국적|이색"),
        (AttractionStyle::History, "역사|유적|궁궐|고궁"),
    ]
    .into_iter()
    .map(|(style, pattern)| (style, Regex::new(pattern).unwrap()))
    .collect()
});

/// Priority-ordered: the first category with any keyword hit wins.
/// Korean comes last — generic terms like 김치 appear in reviews of
/// every cuisine.
const FOOD_TYPE_RULES: &[(FoodType, &[&str])] = &[
    (FoodType::Japanese, &["일식", "스시", "초밥", "라멘", "이자카야", "돈카츠", "오마카세"]),
    (FoodType::Chinese, &["중식", "중화", "짜장", "짬뽕", "마라", "딤섬"]),
    (FoodType::Western, &["양식", "파스타", "피자", "스테이크", "브런치", "버거"]),
    (FoodType::SoutheastAsian, &["쌀국수", "베트남", "태국", "팟타이", "분짜", "나시고렝"]),
    (FoodType::Cafe, &["카페", "커피", "디저트", "베이커리", "브레드"]),
    (FoodType::Korean, &["한식", "한정식", "김치", "국밥", "백반", "불고기", "삼겹살"]),
];

/// Provider type tags admitted as attractions.
pub const ALLOWED_TYPES: &[&str] = &[
    "tourist_attraction",
    "museum",
    "park",
    "art_gallery",
    "point_of_interest",
    "establishment",
    "church",
    "hindu_temple",
    "synagogue",
    "mosque",
    "zoo",
    "amusement_park",
    "aquarium",
    "stadium",
    "library",
    "casino",
    "city_hall",
    "campground",
    "natural_feature",
    "local_government_office",
    "cemetery",
    "shopping_mall",
    "spa",
    "gym",
    "lodging",
];

/// Provider type tags that reject a place outright, even when an allowed
/// tag is also present. Text search for 관광지 routinely surfaces these.
pub const DENIED_TYPES: &[&str] = &[
    "restaurant",
    "food",
    "cafe",
    "bar",
    "night_club",
    "travel_agency",
    "real_estate_agency",
];

/// Build the lowercase haystack: name + address + all review texts.
pub fn haystack(name: &str, address: Option<&str>, reviews: &[Review]) -> String {
    let mut parts: Vec<&str> = vec![name];
    if let Some(addr) = address {
        parts.push(addr);
    }
    parts.extend(reviews.iter().filter_map(|r| r.text.as_deref()));
    parts.join(" ").to_lowercase()
}

/// Independent regex tests — flags are not mutually exclusive.
pub fn dining_styles(haystack: &str) -> BTreeSet<DiningStyle> {
    DINING_STYLE_RULES
        .iter()
        .filter(|(_, re)| re.is_match(haystack))
        .map(|(style, _)| *style)
        .collect()
}

pub fn attraction_styles(haystack: &str) -> BTreeSet<AttractionStyle> {
    ATTRACTION_STYLE_RULES
        .iter()
        .filter(|(_, re)| re.is_match(haystack))
        .map(|(style, _)| *style)
        .collect()
}

/// First matching category in priority order; `Other` when nothing matches.
pub fn food_type(haystack: &str) -> FoodType {
    for (food_type, keywords) in FOOD_TYPE_RULES {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return *food_type;
        }
    }
    FoodType::Other
}

/// A place is admitted as an attraction when its type tags intersect the
/// allow-list and do not intersect the deny-list. The deny check takes
/// precedence.
pub fn admit_attraction(types: &[String]) -> bool {
    if types.iter().any(|t| DENIED_TYPES.contains(&t.as_str())) {
        return false;
    }
    types.iter().any(|t| ALLOWED_TYPES.contains(&t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_flags_are_independent() {
        let text = haystack("루프탑 한강뷰 레스토랑", Some("서울 용산구"), &[]);
        let styles = dining_styles(&text);
        assert!(styles.contains(&DiningStyle::View));
        assert!(!styles.contains(&DiningStyle::Meeting));
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "조용한 분위기 좋은 모던 한정식집";
        assert_eq!(dining_styles(text), dining_styles(text));
        assert_eq!(food_type(text), food_type(text));
    }

    #[test]
    fn food_type_priority_order_wins() {
        // Both Japanese (스시) and Korean (김치) keywords present;
        // Japanese precedes Korean in the priority list.
        let text = "스시도 팔고 김치도 주는 집";
        assert_eq!(food_type(text), FoodType::Japanese);
    }

    #[test]
    fn food_type_defaults_to_other() {
        assert_eq!(food_type("그냥 맛있는 곳"), FoodType::Other);
    }

    #[test]
    fn deny_list_hit_rejects_despite_allow_hit() {
        let types = vec![
            "tourist_attraction".to_string(),
            "restaurant".to_string(),
        ];
        assert!(!admit_attraction(&types));
    }

    #[test]
    fn allow_list_admits_clean_attraction() {
        let types = vec!["museum".to_string(), "point_of_interest".to_string()];
        assert!(admit_attraction(&types));
    }

    #[test]
    fn no_allow_hit_rejects() {
        let types = vec!["pharmacy".to_string()];
        assert!(!admit_attraction(&types));
    }

    #[test]
    fn haystack_includes_review_text() {
        let reviews = vec![Review {
            text: Some("기념일에 가기 좋아요".to_string()),
            time: None,
            rating: None,
            author_name: None,
        }];
        let text = haystack("식당", None, &reviews);
        assert!(dining_styles(&text).contains(&DiningStyle::Anniversary));
    }
}
