pub mod error;
pub mod types;

pub use error::{PlacesError, Result};
pub use types::{
    DetailResponse, Geometry, LatLng, OpeningHours, Photo, PlaceDetail, Review, SearchPage,
    SearchResponse, SearchedPlace,
};

use std::time::Duration;

const BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Google Places text search, details, and photo endpoints.
///
/// One request per call; pagination and retry policy belong to the caller.
pub struct PlacesClient {
    client: reqwest::Client,
    api_key: String,
    language: String,
}

impl PlacesClient {
    pub fn new(api_key: String, language: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            language,
        })
    }

    /// Fetch one page of text search results.
    ///
    /// `ZERO_RESULTS` is an empty success; any other non-OK provider status
    /// is an error. Pass the `next_page_token` from the previous page to
    /// continue — the token needs ~2s to activate on the provider side.
    pub async fn text_search(&self, query: &str, page_token: Option<&str>) -> Result<SearchPage> {
        let url = format!("{BASE_URL}/textsearch/json");
        let mut params = vec![
            ("query", query),
            ("key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pagetoken", token));
        }

        tracing::debug!(query, has_token = page_token.is_some(), "Text search request");
        let resp = self.client.get(&url).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: SearchResponse = resp.json().await?;
        match body.status.as_str() {
            "OK" => Ok(SearchPage {
                results: body.results,
                next_page_token: body.next_page_token,
            }),
            "ZERO_RESULTS" => Ok(SearchPage::default()),
            other => Err(PlacesError::Status {
                status: other.to_string(),
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }

    /// Fetch extended attributes for a place, requesting only the declared
    /// field subset (cost-control contract with the provider).
    pub async fn place_details(&self, place_id: &str, fields: &[&str]) -> Result<PlaceDetail> {
        let url = format!("{BASE_URL}/details/json");
        let fields = fields.join(",");
        let params = [
            ("place_id", place_id),
            ("fields", fields.as_str()),
            ("key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];

        tracing::debug!(place_id, "Place details request");
        let resp = self.client.get(&url).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PlacesError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: DetailResponse = resp.json().await?;
        match (body.status.as_str(), body.result) {
            ("OK", Some(detail)) => Ok(detail),
            (status, _) => Err(PlacesError::Status {
                status: status.to_string(),
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }

    /// Derive a photo URL from a photo reference. The photo itself is never
    /// fetched; only the URL is stored.
    pub fn photo_url(&self, photo_reference: Option<&str>) -> Option<String> {
        photo_reference.map(|r| {
            format!(
                "{BASE_URL}/photo?maxwidth=400&photo_reference={r}&key={}",
                self.api_key
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_url_embeds_reference_and_key() {
        let client = PlacesClient::new("test-key".to_string(), "ko".to_string()).unwrap();
        let url = client.photo_url(Some("abc123")).unwrap();
        assert!(url.contains("photo_reference=abc123"));
        assert!(url.contains("key=test-key"));
        assert!(url.contains("maxwidth=400"));
    }

    #[test]
    fn photo_url_without_reference_is_none() {
        let client = PlacesClient::new("test-key".to_string(), "ko".to_string()).unwrap();
        assert!(client.photo_url(None).is_none());
    }

    #[test]
    fn search_response_tolerates_missing_fields() {
        let json = r#"{
            "status": "OK",
            "results": [
                { "place_id": "p1", "name": "식당" }
            ],
            "next_page_token": "tok"
        }"#;
        let resp: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.results.len(), 1);
        assert!(resp.results[0].formatted_address.is_none());
        assert!(resp.results[0].types.is_empty());
        assert_eq!(resp.next_page_token.as_deref(), Some("tok"));
    }

    #[test]
    fn detail_response_keeps_raw_periods() {
        let json = r#"{
            "status": "OK",
            "result": {
                "name": "경복궁",
                "opening_hours": {
                    "weekday_text": ["월요일: 휴무"],
                    "periods": [{"open": {"day": 1, "time": "0900"}}]
                }
            }
        }"#;
        let resp: DetailResponse = serde_json::from_str(json).unwrap();
        let detail = resp.result.unwrap();
        let hours = detail.opening_hours.unwrap();
        assert!(hours.periods.unwrap().is_array());
    }
}
