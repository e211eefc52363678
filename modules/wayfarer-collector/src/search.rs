use std::time::Duration;

use tracing::warn;

use places_client::SearchedPlace;
use wayfarer_common::Query;

use crate::traits::PlaceProvider;

/// Wait for the provider's continuation token to activate. The token
/// returned with a page is not immediately valid; fetching without the
/// delay fails with INVALID_REQUEST.
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

/// Drive pagination for one query: a single forward pass, finite, not
/// restartable.
///
/// A provider error mid-pagination aborts this query only — pages already
/// fetched are kept, the error is logged, and the caller moves on.
pub async fn collect_pages(provider: &dyn PlaceProvider, query: &Query) -> Vec<SearchedPlace> {
    let mut results = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        if page_token.is_some() {
            tokio::time::sleep(PAGE_TOKEN_DELAY).await;
        }

        match provider.search_page(&query.text, page_token.as_deref()).await {
            Ok(page) => {
                results.extend(page.results);
                match page.next_page_token {
                    Some(token) => page_token = Some(token),
                    None => break,
                }
            }
            Err(e) => {
                warn!(
                    query = query.text.as_str(),
                    error = %e,
                    pages_kept = !results.is_empty(),
                    "Search failed mid-pagination, keeping partial results"
                );
                break;
            }
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page, searched_place, MockProvider};

    fn query() -> Query {
        Query {
            text: "서울 강남 맛집".to_string(),
            area: "강남".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn follows_tokens_and_waits_before_each_continuation() {
        let provider = MockProvider::new()
            .on_page(
                "서울 강남 맛집",
                None,
                page(vec![searched_place("p1", "가")], Some("t1")),
            )
            .on_page(
                "서울 강남 맛집",
                Some("t1"),
                page(vec![searched_place("p2", "나")], Some("t2")),
            )
            .on_page(
                "서울 강남 맛집",
                Some("t2"),
                page(vec![searched_place("p3", "다")], None),
            );

        let start = tokio::time::Instant::now();
        let results = collect_pages(&provider, &query()).await;

        // 2 continuation tokens → exactly 3 requests, each continuation
        // preceded by the activation delay.
        assert_eq!(results.len(), 3);
        assert_eq!(provider.search_requests.lock().unwrap().len(), 3);
        assert!(start.elapsed() >= PAGE_TOKEN_DELAY * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn mid_pagination_failure_keeps_partial_results() {
        let provider = MockProvider::new()
            .on_page(
                "서울 강남 맛집",
                None,
                page(vec![searched_place("p1", "가")], Some("t1")),
            )
            .fail_page("서울 강남 맛집", Some("t1"));

        let results = collect_pages(&provider, &query()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].place_id, "p1");
    }

    #[tokio::test]
    async fn empty_page_terminates_without_delay() {
        let provider =
            MockProvider::new().on_page("서울 강남 맛집", None, page(vec![], None));

        let results = collect_pages(&provider, &query()).await;
        assert!(results.is_empty());
        assert_eq!(provider.search_requests.lock().unwrap().len(), 1);
    }
}
