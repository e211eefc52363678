//! Postgres persistence for collected places and their reviews.
//!
//! Every statement checks out its own pooled connection; sqlx returns it
//! on all exit paths. The conflict target on both place tables is
//! `place_id`; what a conflicting insert does is the deployment-wide
//! [`ConflictPolicy`] chosen at construction.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use wayfarer_common::{AttractionRecord, ConflictPolicy, DiningRecord, Domain, PlaceRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// What an upsert did: created a new row, or hit the conflict target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    AlreadyPresent,
}

pub struct PlaceStore {
    pool: PgPool,
    policy: ConflictPolicy,
}

impl PlaceStore {
    pub fn new(pool: PgPool, policy: ConflictPolicy) -> Self {
        Self { pool, policy }
    }

    pub async fn connect(database_url: &str, policy: ConflictPolicy) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool, policy))
    }

    /// Run pending embedded migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Persist one place record, then its qualifying reviews. Review inserts
    /// use conflict-do-nothing semantics keyed by (domain, place_ref, comment),
    /// so re-running a collection never duplicates reviews.
    pub async fn upsert(&self, record: &PlaceRecord) -> Result<UpsertOutcome, StoreError> {
        let outcome = match record {
            PlaceRecord::Dining(r) => self.upsert_dining(r).await?,
            PlaceRecord::Attraction(r) => self.upsert_attraction(r).await?,
        };

        self.insert_reviews(record).await?;

        tracing::debug!(
            place = record.name(),
            outcome = ?outcome,
            "Place persisted"
        );
        Ok(outcome)
    }

    async fn upsert_dining(&self, r: &DiningRecord) -> Result<UpsertOutcome, StoreError> {
        let already_present = match self.policy {
            ConflictPolicy::KeepExisting => false,
            // Refresh always touches the row, so rows_affected can't tell a
            // fresh insert from a conflict. Check first; this pipeline is the
            // only writer.
            ConflictPolicy::RefreshVolatile => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM dining_places WHERE place_id = $1)",
                )
                .bind(&r.place_id)
                .fetch_one(&self.pool)
                .await?
            }
        };

        let sql = format!(
            r#"
            INSERT INTO dining_places (
                place_id, name, location, area, rating, review_count, price_level,
                image_url, food_type,
                style_date, style_business, style_anniversary, style_team, style_family,
                style_view, style_meeting, style_quiet, style_modern, style_traditional,
                opening_hours, opening_periods, phone_number, latitude, longitude, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                    $10, $11, $12, $13, $14, $15, $16, $17, $18, $19,
                    $20, $21, $22, $23, $24, $25)
            {}
            "#,
            conflict_clause(self.policy)
        );

        use wayfarer_common::DiningStyle::*;
        let result = sqlx::query(&sql)
            .bind(&r.place_id)
            .bind(&r.name)
            .bind(&r.address)
            .bind(&r.area)
            .bind(r.rating)
            .bind(r.review_count)
            .bind(r.price_level)
            .bind(&r.image_url)
            .bind(r.food_type.label())
            .bind(r.styles.contains(&Date))
            .bind(r.styles.contains(&Business))
            .bind(r.styles.contains(&Anniversary))
            .bind(r.styles.contains(&Team))
            .bind(r.styles.contains(&Family))
            .bind(r.styles.contains(&View))
            .bind(r.styles.contains(&Meeting))
            .bind(r.styles.contains(&Quiet))
            .bind(r.styles.contains(&Modern))
            .bind(r.styles.contains(&Traditional))
            .bind(&r.opening_hours_text)
            .bind(&r.opening_periods)
            .bind(&r.phone_number)
            .bind(r.lat)
            .bind(r.lng)
            .bind(r.created_at)
            .execute(&self.pool)
            .await?;

        Ok(outcome_for(self.policy, already_present, result.rows_affected()))
    }

    async fn upsert_attraction(&self, r: &AttractionRecord) -> Result<UpsertOutcome, StoreError> {
        let already_present = match self.policy {
            ConflictPolicy::KeepExisting => false,
            ConflictPolicy::RefreshVolatile => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM attraction_places WHERE place_id = $1)",
                )
                .bind(&r.place_id)
                .fetch_one(&self.pool)
                .await?
            }
        };

        let sql = format!(
            r#"
            INSERT INTO attraction_places (
                place_id, name, location, area, rating, review_count, price_level,
                image_url,
                style_activity, style_hotplace, style_nature, style_landmark, style_healing,
                style_culture, style_photo, style_shopping, style_exotic, style_history,
                opening_hours, opening_periods, phone_number, latitude, longitude, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    $9, $10, $11, $12, $13, $14, $15, $16, $17, $18,
                    $19, $20, $21, $22, $23, $24)
            {}
            "#,
            conflict_clause(self.policy)
        );

        use wayfarer_common::AttractionStyle::*;
        let result = sqlx::query(&sql)
            .bind(&r.place_id)
            .bind(&r.name)
            .bind(&r.address)
            .bind(&r.area)
            .bind(r.rating)
            .bind(r.review_count)
            .bind(r.price_level)
            .bind(&r.image_url)
            .bind(r.styles.contains(&Activity))
            .bind(r.styles.contains(&Hotplace))
            .bind(r.styles.contains(&Nature))
            .bind(r.styles.contains(&Landmark))
            .bind(r.styles.contains(&Healing))
            .bind(r.styles.contains(&Culture))
            .bind(r.styles.contains(&Photo))
            .bind(r.styles.contains(&Shopping))
            .bind(r.styles.contains(&Exotic))
            .bind(r.styles.contains(&History))
            .bind(&r.opening_hours_text)
            .bind(&r.opening_periods)
            .bind(&r.phone_number)
            .bind(r.lat)
            .bind(r.lng)
            .bind(r.created_at)
            .execute(&self.pool)
            .await?;

        Ok(outcome_for(self.policy, already_present, result.rows_affected()))
    }

    /// Insert each qualifying review, linked to its place by a provider-id
    /// lookup at insert time.
    async fn insert_reviews(&self, record: &PlaceRecord) -> Result<(), StoreError> {
        let table = place_table(record.domain());
        let sql = format!(
            r#"
            INSERT INTO place_reviews (domain, place_ref, comment, created_at)
            VALUES ($1, (SELECT id FROM {table} WHERE place_id = $2), $3, $4)
            ON CONFLICT (domain, place_ref, comment) DO NOTHING
            "#
        );

        for review in record.reviews().iter().filter(|r| r.qualifies()) {
            sqlx::query(&sql)
                .bind(record.domain().as_str())
                .bind(record.place_id())
                .bind(&review.text)
                .bind(review.created_at)
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }

    // --- Read helpers (used by the excluded REST layer and by tests) ---

    pub async fn find_dining(&self, place_id: &str) -> Result<Option<DiningRow>, StoreError> {
        let row = sqlx::query_as::<_, DiningRow>("SELECT * FROM dining_places WHERE place_id = $1")
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_attraction(
        &self,
        place_id: &str,
    ) -> Result<Option<AttractionRow>, StoreError> {
        let row = sqlx::query_as::<_, AttractionRow>(
            "SELECT * FROM attraction_places WHERE place_id = $1",
        )
        .bind(place_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn count_places(&self, domain: Domain) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", place_table(domain));
        let count = sqlx::query_scalar::<_, i64>(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    pub async fn review_count(&self, domain: Domain, place_id: &str) -> Result<i64, StoreError> {
        let table = place_table(domain);
        let sql = format!(
            r#"
            SELECT COUNT(*) FROM place_reviews
            WHERE domain = $1
              AND place_ref = (SELECT id FROM {table} WHERE place_id = $2)
            "#
        );
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(domain.as_str())
            .bind(place_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn place_table(domain: Domain) -> &'static str {
    match domain {
        Domain::Dining => "dining_places",
        Domain::Attraction => "attraction_places",
    }
}

fn conflict_clause(policy: ConflictPolicy) -> &'static str {
    match policy {
        ConflictPolicy::KeepExisting => "ON CONFLICT (place_id) DO NOTHING",
        ConflictPolicy::RefreshVolatile => {
            r#"ON CONFLICT (place_id) DO UPDATE SET
                rating = EXCLUDED.rating,
                review_count = EXCLUDED.review_count,
                price_level = EXCLUDED.price_level,
                image_url = EXCLUDED.image_url"#
        }
    }
}

fn outcome_for(policy: ConflictPolicy, already_present: bool, rows_affected: u64) -> UpsertOutcome {
    match policy {
        ConflictPolicy::KeepExisting if rows_affected == 0 => UpsertOutcome::AlreadyPresent,
        ConflictPolicy::RefreshVolatile if already_present => UpsertOutcome::AlreadyPresent,
        _ => UpsertOutcome::Inserted,
    }
}

/// Stored dining row, as read back from Postgres.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiningRow {
    pub id: i32,
    pub place_id: String,
    pub name: String,
    pub location: Option<String>,
    pub area: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub price_level: Option<i32>,
    pub image_url: Option<String>,
    pub food_type: Option<String>,
    pub style_date: bool,
    pub style_business: bool,
    pub style_anniversary: bool,
    pub style_team: bool,
    pub style_family: bool,
    pub style_view: bool,
    pub style_meeting: bool,
    pub style_quiet: bool,
    pub style_modern: bool,
    pub style_traditional: bool,
    pub opening_hours: Option<String>,
    pub opening_periods: Option<serde_json::Value>,
    pub phone_number: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Stored attraction row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttractionRow {
    pub id: i32,
    pub place_id: String,
    pub name: String,
    pub location: Option<String>,
    pub area: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i32>,
    pub price_level: Option<i32>,
    pub image_url: Option<String>,
    pub style_activity: bool,
    pub style_hotplace: bool,
    pub style_nature: bool,
    pub style_landmark: bool,
    pub style_healing: bool,
    pub style_culture: bool,
    pub style_photo: bool,
    pub style_shopping: bool,
    pub style_exotic: bool,
    pub style_history: bool,
    pub opening_hours: Option<String>,
    pub opening_periods: Option<serde_json::Value>,
    pub phone_number: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}
