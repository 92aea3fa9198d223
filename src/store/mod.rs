// src/store/mod.rs

pub mod model;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use geo_types::Point;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, QueryBuilder, Row};
use tracing::{debug, info};

pub use model::{ActiveRegion, Observation, QueryLogEntry, RoadSegment, RunBatch};

/// Rows per INSERT statement; keeps bind parameters well under the protocol limit.
const INSERT_CHUNK_ROWS: usize = 1000;

/// Persistence the collector needs. Timestamps are UTC throughout.
#[async_trait]
pub trait TrafficStore: Send + Sync {
    /// The single active region, if any is configured.
    async fn active_region(&self) -> Result<Option<ActiveRegion>>;

    async fn region_segments(&self, region_id: i32) -> Result<Vec<RoadSegment>>;

    /// Applies distance updates, observations and the log row atomically.
    async fn write_run(&self, batch: &RunBatch) -> Result<()>;

    /// Advances `last_queried_at` and `updated_at` for the region.
    async fn mark_queried(&self, region_id: i32, at: DateTime<Utc>) -> Result<()>;
}

// ============================================================================
// PostgreSQL Store
// ============================================================================

/// Columns hold naive timestamps that are interpreted as UTC.
pub struct PgTrafficStore {
    pool: PgPool,
}

impl PgTrafficStore {
    /// Opens the one connection the job holds for its lifetime.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(connection_string)
            .await
            .context("Failed to connect to PostgreSQL")?;

        debug!("database connection established");
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn region_from_row(row: &PgRow) -> Result<ActiveRegion> {
    let last_queried_at: Option<NaiveDateTime> = row.try_get("last_queried_at")?;

    Ok(ActiveRegion {
        region_id: row.try_get("region_id")?,
        region_name: row.try_get("region_name")?,
        queries_per_day: row.try_get("queries_per_day")?,
        interval_hours: row.try_get("interval_hours")?,
        last_queried_at: last_queried_at.map(|t| t.and_utc()),
        segment_count: row.try_get("segment_count")?,
    })
}

fn segment_from_row(row: &PgRow) -> Result<RoadSegment> {
    let start_lat: f64 = row.try_get("start_lat")?;
    let start_lng: f64 = row.try_get("start_lng")?;
    let end_lat: f64 = row.try_get("end_lat")?;
    let end_lng: f64 = row.try_get("end_lng")?;

    Ok(RoadSegment {
        segment_id: row.try_get("segment_id")?,
        start: Point::new(start_lng, start_lat),
        end: Point::new(end_lng, end_lat),
    })
}

#[async_trait]
impl TrafficStore for PgTrafficStore {
    async fn active_region(&self) -> Result<Option<ActiveRegion>> {
        let row = sqlx::query(
            r#"
            SELECT
                cc.region_id,
                r.region_name,
                cc.queries_per_day,
                cc.interval_hours::float8 AS interval_hours,
                cc.last_queried_at,
                r.segment_count
            FROM collection_config cc
            JOIN regions r ON cc.region_id = r.region_id
            WHERE cc.is_active = TRUE
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read active region")?;

        row.as_ref().map(region_from_row).transpose()
    }

    async fn region_segments(&self, region_id: i32) -> Result<Vec<RoadSegment>> {
        let rows = sqlx::query(
            r#"
            SELECT
                segment_id,
                start_lat::float8 AS start_lat,
                start_lng::float8 AS start_lng,
                end_lat::float8 AS end_lat,
                end_lng::float8 AS end_lng
            FROM road_segments
            WHERE region_id = $1
            ORDER BY segment_id
            "#,
        )
        .bind(region_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to load segments for region {region_id}"))?;

        rows.iter().map(segment_from_row).collect()
    }

    async fn write_run(&self, batch: &RunBatch) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        if !batch.distance_updates.is_empty() {
            let (ids, distances): (Vec<i32>, Vec<i64>) =
                batch.distance_updates.iter().copied().unzip();

            sqlx::query(
                r#"
                UPDATE road_segments AS rs
                SET segment_distance_api = u.distance
                FROM UNNEST($1::int4[], $2::int8[]) AS u(segment_id, distance)
                WHERE rs.segment_id = u.segment_id
                "#,
            )
            .bind(ids)
            .bind(distances)
            .execute(&mut *tx)
            .await
            .context("Failed to update segment distances")?;
        }

        if !batch.observations.is_empty() {
            for chunk in batch.observations.chunks(INSERT_CHUNK_ROWS) {
                let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                    "INSERT INTO traffic_observations \
                     (segment_id, region_id, observed_at, \
                      freeflow_duration_seconds, current_duration_seconds) ",
                );
                builder.push_values(chunk, |mut b, obs| {
                    b.push_bind(obs.segment_id)
                        .push_bind(obs.region_id)
                        .push_bind(obs.observed_at.naive_utc())
                        .push_bind(obs.freeflow_seconds)
                        .push_bind(obs.current_seconds);
                });

                builder
                    .build()
                    .execute(&mut *tx)
                    .await
                    .context("Failed to insert traffic observations")?;
            }
        }

        let log = &batch.log;
        sqlx::query(
            r#"
            INSERT INTO query_log
                (region_id, elements_queried, successful_queries, failed_queries, api_response_time_ms)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(log.region_id)
        .bind(log.elements_queried)
        .bind(log.successful_queries)
        .bind(log.failed_queries)
        .bind(log.api_response_time_ms)
        .execute(&mut *tx)
        .await
        .context("Failed to write query log")?;

        tx.commit().await.context("Failed to commit collection results")?;

        info!(
            region_id = log.region_id,
            observations = batch.observations.len(),
            distance_updates = batch.distance_updates.len(),
            "collection results committed"
        );
        Ok(())
    }

    async fn mark_queried(&self, region_id: i32, at: DateTime<Utc>) -> Result<()> {
        let at = at.naive_utc();

        sqlx::query(
            r#"
            UPDATE collection_config
            SET last_queried_at = $1, updated_at = $2
            WHERE region_id = $3
            "#,
        )
        .bind(at)
        .bind(at)
        .bind(region_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to update last query time for region {region_id}"))?;

        Ok(())
    }
}
