use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use places_client::PlaceDetail;
use wayfarer_common::{
    AttractionRecord, CollectedReview, DiningRecord, Domain, PlaceRecord, Query,
};
use wayfarer_store::UpsertOutcome;

use crate::classify;
use crate::dedupe::{self, SearchHit};
use crate::profiles::DomainProfile;
use crate::quality::{self, SkipReason};
use crate::search;
use crate::traits::{PlaceProvider, PlaceWriter};

/// Bound on in-flight detail-fetch + classify + persist pipelines.
pub const MAX_CONCURRENT_DETAILS: usize = 5;

/// Stats from a collection run.
#[derive(Debug, Default)]
pub struct CollectStats {
    pub queries: u32,
    pub collected: u32,
    pub unique: u32,
    pub persisted: u32,
    pub already_present: u32,
    pub skipped_no_price: u32,
    pub skipped_no_image: u32,
    pub skipped_type: u32,
    pub detail_failures: u32,
    pub store_failures: u32,
    pub by_food_type: BTreeMap<String, u32>,
}

impl std::fmt::Display for CollectStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Collection Run Complete ===")?;
        writeln!(f, "Queries issued:    {}", self.queries)?;
        writeln!(f, "Places collected:  {}", self.collected)?;
        writeln!(f, "Unique places:     {}", self.unique)?;
        writeln!(f, "Persisted:         {}", self.persisted)?;
        writeln!(f, "Already present:   {}", self.already_present)?;
        writeln!(
            f,
            "Quality skips:     {} (price {}, image {}, type {})",
            self.skipped_no_price + self.skipped_no_image + self.skipped_type,
            self.skipped_no_price,
            self.skipped_no_image,
            self.skipped_type
        )?;
        writeln!(f, "Detail failures:   {}", self.detail_failures)?;
        writeln!(f, "Store failures:    {}", self.store_failures)?;
        if !self.by_food_type.is_empty() {
            writeln!(f, "\nBy food type:")?;
            for (food_type, count) in &self.by_food_type {
                writeln!(f, "  {}: {}", food_type, count)?;
            }
        }
        Ok(())
    }
}

/// Per-place result of the bounded phase. One place's failure never
/// reaches its siblings.
#[derive(Debug)]
pub enum PlaceOutcome {
    Persisted(Box<PlaceRecord>),
    AlreadyPresent,
    Skipped(SkipReason),
    DetailFailed,
    StoreFailed,
}

pub struct CollectReport {
    pub stats: CollectStats,
    /// Successfully persisted records, for the end-of-run artifact.
    pub records: Vec<PlaceRecord>,
}

pub struct Collector {
    provider: Arc<dyn PlaceProvider>,
    writer: Arc<dyn PlaceWriter>,
    profile: DomainProfile,
}

impl Collector {
    pub fn new(
        provider: Arc<dyn PlaceProvider>,
        writer: Arc<dyn PlaceWriter>,
        profile: DomainProfile,
    ) -> Self {
        Self {
            provider,
            writer,
            profile,
        }
    }

    /// Run the full pipeline: build queries, search each sequentially,
    /// dedupe, then fetch-classify-persist under the concurrency bound.
    pub async fn run(&self) -> Result<CollectReport> {
        let queries = build_queries(&self.profile);
        if queries.is_empty() {
            anyhow::bail!("Query list is empty for domain {}", self.profile.domain);
        }

        let mut stats = CollectStats {
            queries: queries.len() as u32,
            ..Default::default()
        };

        // SEARCH — sequential across queries, to respect the provider's
        // page-token rate limit.
        let mut hits: Vec<SearchHit> = Vec::new();
        for query in &queries {
            info!(query = query.text.as_str(), "Searching");
            let mut places = search::collect_pages(self.provider.as_ref(), query).await;
            if self.profile.domain == Domain::Attraction {
                // Cut detail-fetch spend early; the quality gate re-checks
                // on the detail-fetched types.
                places.retain(|p| classify::admit_attraction(&p.types));
            }
            hits.extend(places.into_iter().map(|place| SearchHit {
                area: query.area.clone(),
                place,
            }));
        }
        stats.collected = hits.len() as u32;

        let unique = dedupe::dedupe(hits);
        stats.unique = unique.len() as u32;
        info!(
            collected = stats.collected,
            unique = stats.unique,
            "Search phase complete"
        );

        // FETCH_CLASSIFY_PERSIST — bounded-parallel, no completion ordering.
        let outcomes: Vec<PlaceOutcome> = stream::iter(
            unique
                .into_iter()
                .map(|hit| async move { self.process_place(hit).await }),
        )
        .buffer_unordered(MAX_CONCURRENT_DETAILS)
        .collect()
        .await;

        let mut records = Vec::new();
        for outcome in outcomes {
            match outcome {
                PlaceOutcome::Persisted(record) => {
                    stats.persisted += 1;
                    if let PlaceRecord::Dining(r) = record.as_ref() {
                        *stats
                            .by_food_type
                            .entry(r.food_type.label().to_string())
                            .or_insert(0) += 1;
                    }
                    records.push(*record);
                }
                PlaceOutcome::AlreadyPresent => stats.already_present += 1,
                PlaceOutcome::Skipped(SkipReason::NoPriceTier) => stats.skipped_no_price += 1,
                PlaceOutcome::Skipped(SkipReason::NoImage) => stats.skipped_no_image += 1,
                PlaceOutcome::Skipped(SkipReason::DisallowedType) => stats.skipped_type += 1,
                PlaceOutcome::DetailFailed => stats.detail_failures += 1,
                PlaceOutcome::StoreFailed => stats.store_failures += 1,
            }
        }

        info!("{stats}");
        Ok(CollectReport { stats, records })
    }

    async fn process_place(&self, hit: SearchHit) -> PlaceOutcome {
        let detail = match self
            .provider
            .detail(&hit.place.place_id, self.profile.detail_fields)
            .await
        {
            Ok(detail) => detail,
            Err(e) => {
                warn!(
                    place = hit.place.name.as_str(),
                    error = %e,
                    "Detail fetch failed, skipping place"
                );
                return PlaceOutcome::DetailFailed;
            }
        };

        let record = self.build_record(&hit, detail);

        if let Some(reason) = quality::check(&record) {
            info!(place = record.name(), %reason, "Quality skip");
            return PlaceOutcome::Skipped(reason);
        }

        match self.writer.upsert(&record).await {
            Ok(UpsertOutcome::Inserted) => {
                info!(place = record.name(), "Persisted");
                PlaceOutcome::Persisted(Box::new(record))
            }
            Ok(UpsertOutcome::AlreadyPresent) => PlaceOutcome::AlreadyPresent,
            Err(e) => {
                warn!(place = record.name(), error = %e, "Store failed, dropping place");
                PlaceOutcome::StoreFailed
            }
        }
    }

    /// Merge search result and detail into a classified, persistence-ready
    /// record. Detail fields win over their search counterparts.
    fn build_record(&self, hit: &SearchHit, detail: PlaceDetail) -> PlaceRecord {
        let place = &hit.place;
        let name = detail.name.clone().unwrap_or_else(|| place.name.clone());
        let address = detail
            .formatted_address
            .clone()
            .or_else(|| place.formatted_address.clone());
        let text = classify::haystack(&name, address.as_deref(), &detail.reviews);

        let image_url = self
            .provider
            .photo_url(detail.photo_reference().or_else(|| place.photo_reference()));

        let reviews: Vec<CollectedReview> = detail
            .reviews
            .iter()
            .filter_map(|r| {
                let text = r.text.clone()?;
                let created_at = r.time.and_then(|t| Utc.timestamp_opt(t, 0).single());
                Some(CollectedReview { text, created_at })
            })
            .collect();

        let (opening_hours_text, opening_periods) = match detail.opening_hours {
            Some(hours) => (hours.weekday_text.map(|w| w.join("\n")), hours.periods),
            None => (None, None),
        };
        let location = detail.geometry.as_ref().and_then(|g| g.location);

        let rating = detail.rating.or(place.rating);
        let review_count = detail.user_ratings_total.or(place.user_ratings_total);
        let price_level = detail.price_level.or(place.price_level);

        match self.profile.domain {
            Domain::Dining => PlaceRecord::Dining(DiningRecord {
                place_id: place.place_id.clone(),
                name,
                address,
                area: hit.area.clone(),
                rating,
                review_count,
                price_level,
                image_url,
                styles: classify::dining_styles(&text),
                food_type: classify::food_type(&text),
                opening_hours_text,
                opening_periods,
                phone_number: detail.formatted_phone_number,
                lat: location.map(|l| l.lat),
                lng: location.map(|l| l.lng),
                reviews,
                created_at: Utc::now(),
            }),
            Domain::Attraction => PlaceRecord::Attraction(AttractionRecord {
                place_id: place.place_id.clone(),
                name,
                address,
                area: hit.area.clone(),
                rating,
                review_count,
                price_level,
                image_url,
                styles: classify::attraction_styles(&text),
                types: if detail.types.is_empty() {
                    place.types.clone()
                } else {
                    detail.types
                },
                opening_hours_text,
                opening_periods,
                phone_number: detail.formatted_phone_number,
                lat: location.map(|l| l.lat),
                lng: location.map(|l| l.lng),
                reviews,
                created_at: Utc::now(),
            }),
        }
    }
}

/// Cross product of areas × styles (dining), or areas alone (attraction).
pub fn build_queries(profile: &DomainProfile) -> Vec<Query> {
    let mut queries = Vec::new();
    for area in &profile.areas {
        match profile.domain {
            Domain::Dining => {
                for style in profile.styles {
                    queries.push(Query {
                        text: format!("서울 {area} {style} 맛집"),
                        area: area.to_string(),
                    });
                }
            }
            Domain::Attraction => {
                queries.push(Query {
                    text: format!("서울 {area} 관광지"),
                    area: area.to_string(),
                });
            }
        }
    }
    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles;

    #[test]
    fn dining_queries_are_the_area_style_cross_product() {
        let profile = profiles::profile(Domain::Dining);
        let queries = build_queries(&profile);
        assert_eq!(
            queries.len(),
            profile.areas.len() * profile.styles.len()
        );
        assert_eq!(queries[0].text, "서울 강남 데이트용 맛집");
        assert_eq!(queries[0].area, "강남");
    }

    #[test]
    fn attraction_queries_use_areas_alone() {
        let profile = profiles::profile(Domain::Attraction);
        let queries = build_queries(&profile);
        assert_eq!(queries.len(), profile.areas.len());
        assert_eq!(queries[0].text, "서울 강남 관광지");
    }
}
