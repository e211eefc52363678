use std::collections::HashSet;

use places_client::SearchedPlace;

/// A search result tagged with the district whose query produced it.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub area: String,
    pub place: SearchedPlace,
}

/// Collapse results collected across many queries into a unique set.
///
/// Two signals independently suppress duplicates: the provider id, and a
/// normalized name+address key — the provider sometimes returns distinct
/// ids for what is semantically the same listing. First seen wins; later
/// duplicates are discarded, not merged.
pub fn dedupe(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    hits.into_iter()
        .filter(|hit| {
            let id_fresh = seen_ids.insert(hit.place.place_id.clone());
            let name_fresh = seen_names.insert(name_key(&hit.place));
            id_fresh && name_fresh
        })
        .collect()
}

/// Lowercased, whitespace-stripped name+address.
fn name_key(place: &SearchedPlace) -> String {
    let mut key = String::with_capacity(
        place.name.len() + place.formatted_address.as_deref().map_or(0, str::len),
    );
    key.push_str(&place.name);
    if let Some(addr) = &place.formatted_address {
        key.push_str(addr);
    }
    key.to_lowercase().split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::searched_place;

    fn hit(place_id: &str, name: &str, address: &str) -> SearchHit {
        let mut place = searched_place(place_id, name);
        place.formatted_address = Some(address.to_string());
        SearchHit {
            area: "강남".to_string(),
            place,
        }
    }

    #[test]
    fn duplicate_provider_ids_collapse_to_first_seen() {
        let hits = vec![
            hit("p1", "식당 가", "주소 1"),
            hit("p1", "식당 가 (2호점)", "주소 2"),
            hit("p2", "식당 나", "주소 3"),
        ];
        let unique = dedupe(hits);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].place.name, "식당 가");
    }

    #[test]
    fn distinct_ids_with_same_name_and_address_collapse() {
        let hits = vec![
            hit("p1", "한강 뷰 식당", "서울 강남구 1-1"),
            // Same listing, different provider id, casing and spacing
            hit("p2", "한강 뷰  식당", "서울 강남구  1-1"),
        ];
        let unique = dedupe(hits);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].place.place_id, "p1");
    }

    #[test]
    fn dedupe_is_a_fixed_point() {
        let hits = vec![
            hit("p1", "가", "주소 1"),
            hit("p1", "가", "주소 1"),
            hit("p2", "나", "주소 2"),
        ];
        let once = dedupe(hits);
        let sizes: Vec<_> = once.iter().map(|h| h.place.place_id.clone()).collect();
        let twice = dedupe(once);
        assert_eq!(
            twice.iter().map(|h| h.place.place_id.clone()).collect::<Vec<_>>(),
            sizes
        );
    }
}
