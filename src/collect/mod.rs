// src/collect/mod.rs

pub mod model;
pub mod report;

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::collect::model::{CollectionSummary, RunOutcome};
use crate::config::{
    BANNER_WIDTH, DAILY_ELEMENT_LIMIT, DISTANCE_MATRIX_URL, ENV_API_KEY, ENV_API_URL,
    ENV_DB_CONNECTION, REQUEST_DELAY_MS, REQUEST_TIMEOUT_SECS,
};
use crate::distance::{DistanceMatrixClient, QueryFailure, TravelTimeSource};
use crate::gate::{hours_remaining, hours_since, should_query_now};
use crate::store::{
    ActiveRegion, Observation, PgTrafficStore, QueryLogEntry, RunBatch, TrafficStore,
};
use crate::utils::{require_env, resolve_url};

// ============================================================================
// Argument Structure
// ============================================================================

#[derive(clap::Args)]
pub struct CollectArgs {
    /// Pause between segment queries, in milliseconds
    #[arg(long, default_value_t = REQUEST_DELAY_MS)]
    delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Soft ceiling on API elements per day (warning only)
    #[arg(long, default_value_t = DAILY_ELEMENT_LIMIT)]
    daily_limit: u32,
}

impl Default for CollectArgs {
    fn default() -> Self {
        Self {
            delay_ms: REQUEST_DELAY_MS,
            timeout_secs: REQUEST_TIMEOUT_SECS,
            daily_limit: DAILY_ELEMENT_LIMIT,
        }
    }
}

// ============================================================================
// Main Execution
// ============================================================================

pub async fn run(args: CollectArgs) -> Result<RunOutcome> {
    let db_connection = require_env(ENV_DB_CONNECTION)?;
    let api_key = require_env(ENV_API_KEY)?;
    let api_url = resolve_url(ENV_API_URL, DISTANCE_MATRIX_URL)?;

    let source = DistanceMatrixClient::new(
        api_url,
        api_key,
        Duration::from_secs(args.timeout_secs),
    )?;
    let store = PgTrafficStore::connect(&db_connection).await?;

    let collector = Collector {
        store: &store,
        source: &source,
        request_delay: Duration::from_millis(args.delay_ms),
        daily_limit: args.daily_limit,
    };
    let outcome = collector.run().await;

    store.close().await;
    outcome
}

// ============================================================================
// Collector
// ============================================================================

/// One scheduled pass over the active region.
pub struct Collector<'a, S: TrafficStore, T: TravelTimeSource> {
    pub store: &'a S,
    pub source: &'a T,
    pub request_delay: Duration,
    pub daily_limit: u32,
}

impl<S: TrafficStore, T: TravelTimeSource> Collector<'_, S, T> {
    pub async fn run(&self) -> Result<RunOutcome> {
        let now = Utc::now();
        report::print_header("SCHEDULED TRAFFIC DATA COLLECTION", now);

        let Some(region) = self.store.active_region().await? else {
            report::print_no_active_region();
            return Ok(RunOutcome::NoActiveRegion);
        };

        report::print_region(&region, now, self.daily_limit);

        if !should_query_now(region.last_queried_at, region.interval_hours, now) {
            let since = region
                .last_queried_at
                .map(|last| hours_since(last, now))
                .unwrap_or_default();
            let remaining = hours_remaining(region.last_queried_at, region.interval_hours, now);

            report::print_skip(since, region.interval_hours, remaining);
            println!();
            report::print_footer();

            return Ok(RunOutcome::Skipped {
                hours_since: since,
                hours_remaining: remaining,
            });
        }

        println!("\n Interval passed. Starting collection...");
        println!("{}", "-".repeat(BANNER_WIDTH));

        let result = self.collect_and_mark(&region).await;
        match &result {
            Ok(summary) => report::print_complete(summary),
            Err(e) => println!("\n COLLECTION FAILED: {e:#}"),
        }
        report::print_footer();

        result.map(RunOutcome::Completed)
    }

    async fn collect_and_mark(&self, region: &ActiveRegion) -> Result<CollectionSummary> {
        let summary = self.collect_region(region).await?;

        self.store
            .mark_queried(region.region_id, Utc::now())
            .await?;

        Ok(summary)
    }

    /// Queries every segment once, then writes all results in one batch.
    async fn collect_region(&self, region: &ActiveRegion) -> Result<CollectionSummary> {
        let region_id = region.region_id;
        println!("Collecting traffic data for region {region_id}...");

        let segments = self.store.region_segments(region_id).await?;
        println!("Querying {} segments...", segments.len());

        // Shared by every observation of this run.
        let observed_at = Utc::now();

        let mut observations = Vec::with_capacity(segments.len());
        let mut distance_updates = Vec::with_capacity(segments.len());
        let mut summary = CollectionSummary::default();

        let started = Instant::now();

        for (idx, segment) in segments.iter().enumerate() {
            if idx > 0 && !self.request_delay.is_zero() {
                sleep(self.request_delay).await;
            }

            print!(
                "  [{}/{}] Segment {}... ",
                idx + 1,
                segments.len(),
                segment.segment_id
            );
            std::io::stdout().flush().ok();

            match self.source.travel_time(segment.start, segment.end).await {
                Ok(travel) => {
                    observations.push(Observation {
                        segment_id: segment.segment_id,
                        region_id,
                        observed_at,
                        freeflow_seconds: travel.freeflow_seconds,
                        current_seconds: travel.current_seconds,
                    });
                    distance_updates.push((segment.segment_id, travel.distance_meters));
                    summary.successful += 1;

                    println!(
                        "✓ {}s ({:+}s, ratio {:.2})",
                        travel.current_seconds,
                        travel.delay_seconds(),
                        travel.congestion_ratio()
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    report_failure(segment.segment_id, &e);
                }
            }
        }

        let elapsed_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

        if !observations.is_empty() {
            println!("💾 Saving {} observations...", observations.len());
        }

        let batch = RunBatch {
            distance_updates,
            observations,
            log: QueryLogEntry {
                region_id,
                elements_queried: summary.total(),
                successful_queries: summary.successful,
                failed_queries: summary.failed,
                api_response_time_ms: elapsed_ms,
            },
        };

        self.store
            .write_run(&batch)
            .await
            .context("Failed to save collection results")?;

        info!(
            region_id,
            successful = summary.successful,
            failed = summary.failed,
            elapsed_ms,
            "collection pass finished"
        );
        Ok(summary)
    }
}

fn report_failure(segment_id: i32, failure: &QueryFailure) {
    match failure {
        QueryFailure::QuotaExceeded => println!("QUOTA EXCEEDED!"),
        QueryFailure::ElementQuotaExceeded => println!("Element quota exceeded"),
        other => println!("Failed ({other})"),
    }
    warn!(segment_id, error = %failure, "segment query failed");
}
