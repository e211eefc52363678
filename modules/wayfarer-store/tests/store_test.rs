//! Integration tests for PlaceStore. Requires a Postgres instance.
//! Set DATABASE_TEST_URL or these tests are skipped.

use chrono::Utc;
use wayfarer_common::{CollectedReview, ConflictPolicy, DiningRecord, Domain, FoodType, PlaceRecord};
use wayfarer_store::{PlaceStore, UpsertOutcome};

async fn connect(policy: ConflictPolicy) -> Option<PlaceStore> {
    let url = match std::env::var("DATABASE_TEST_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_TEST_URL not set, skipping store test");
            return None;
        }
    };
    let store = PlaceStore::connect(&url, policy).await.expect("connect");
    store.migrate().await.expect("migrate");
    Some(store)
}

fn unique_place_id(prefix: &str) -> String {
    format!(
        "{prefix}-{}",
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    )
}

fn dining_record(place_id: &str) -> PlaceRecord {
    PlaceRecord::Dining(DiningRecord {
        place_id: place_id.to_string(),
        name: "테스트 식당".to_string(),
        address: Some("서울 강남구 테헤란로 1".to_string()),
        area: "강남".to_string(),
        rating: Some(4.2),
        review_count: Some(80),
        price_level: Some(2),
        image_url: Some("https://photos.test/ref-1".to_string()),
        styles: Default::default(),
        food_type: FoodType::Korean,
        opening_hours_text: Some("월요일: 휴무".to_string()),
        opening_periods: Some(serde_json::json!([{"open": {"day": 1, "time": "0900"}}])),
        phone_number: Some("02-000-0000".to_string()),
        lat: Some(37.4979),
        lng: Some(127.0276),
        reviews: vec![
            CollectedReview {
                text: "정말 맛있고 분위기도 좋았습니다".to_string(),
                created_at: Some(Utc::now()),
            },
            // Does not qualify: 10 chars or fewer
            CollectedReview {
                text: "맛있어요".to_string(),
                created_at: Some(Utc::now()),
            },
        ],
        created_at: Utc::now(),
    })
}

#[tokio::test]
async fn keep_existing_upsert_is_idempotent() {
    let Some(store) = connect(ConflictPolicy::KeepExisting).await else {
        return;
    };
    let place_id = unique_place_id("keep");
    let record = dining_record(&place_id);

    let first = store.upsert(&record).await.expect("first upsert");
    let second = store.upsert(&record).await.expect("second upsert");

    assert_eq!(first, UpsertOutcome::Inserted);
    assert_eq!(second, UpsertOutcome::AlreadyPresent);

    let row = store
        .find_dining(&place_id)
        .await
        .expect("find")
        .expect("row exists");
    assert_eq!(row.food_type.as_deref(), Some("한식"));
    assert_eq!(row.area.as_deref(), Some("강남"));
}

#[tokio::test]
async fn keep_existing_does_not_overwrite_fields() {
    let Some(store) = connect(ConflictPolicy::KeepExisting).await else {
        return;
    };
    let place_id = unique_place_id("keep-fields");
    let record = dining_record(&place_id);
    store.upsert(&record).await.expect("first upsert");

    let mut updated = record.clone();
    if let PlaceRecord::Dining(r) = &mut updated {
        r.rating = Some(1.0);
    }
    store.upsert(&updated).await.expect("second upsert");

    let row = store.find_dining(&place_id).await.unwrap().unwrap();
    assert_eq!(row.rating, Some(4.2));
}

#[tokio::test]
async fn refresh_overwrites_only_volatile_fields() {
    let Some(store) = connect(ConflictPolicy::RefreshVolatile).await else {
        return;
    };
    let place_id = unique_place_id("refresh");
    let record = dining_record(&place_id);
    let first = store.upsert(&record).await.expect("first upsert");
    assert_eq!(first, UpsertOutcome::Inserted);

    let mut updated = record.clone();
    if let PlaceRecord::Dining(r) = &mut updated {
        r.rating = Some(4.8);
        r.review_count = Some(200);
        r.name = "이름이 바뀐 식당".to_string();
    }
    let second = store.upsert(&updated).await.expect("second upsert");
    assert_eq!(second, UpsertOutcome::AlreadyPresent);

    let row = store.find_dining(&place_id).await.unwrap().unwrap();
    assert_eq!(row.rating, Some(4.8));
    assert_eq!(row.review_count, Some(200));
    // Name is not a volatile field.
    assert_eq!(row.name, "테스트 식당");
}

#[tokio::test]
async fn only_qualifying_reviews_are_persisted_once() {
    let Some(store) = connect(ConflictPolicy::KeepExisting).await else {
        return;
    };
    let place_id = unique_place_id("reviews");
    let record = dining_record(&place_id);

    store.upsert(&record).await.expect("first upsert");
    store.upsert(&record).await.expect("second upsert");

    let count = store
        .review_count(Domain::Dining, &place_id)
        .await
        .expect("review count");
    // One of the two reviews qualifies; the duplicate insert is a no-op.
    assert_eq!(count, 1);
}
