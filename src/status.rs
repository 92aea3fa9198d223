// src/status.rs

use anyhow::Result;
use chrono::Utc;

use crate::collect::report;
use crate::config::{DAILY_ELEMENT_LIMIT, ENV_DB_CONNECTION};
use crate::gate::{hours_remaining, should_query_now};
use crate::store::{PgTrafficStore, TrafficStore};
use crate::utils::require_env;

#[derive(clap::Args)]
pub struct StatusArgs {
    /// Soft ceiling on API elements per day used for the projection warning
    #[arg(long, default_value_t = DAILY_ELEMENT_LIMIT)]
    daily_limit: u32,
}

/// Read-only view of the active region and whether a `collect` run would query now.
pub async fn run(args: StatusArgs) -> Result<()> {
    let db_connection = require_env(ENV_DB_CONNECTION)?;
    let store = PgTrafficStore::connect(&db_connection).await?;

    let result = print_status(&store, args.daily_limit).await;

    store.close().await;
    result
}

async fn print_status<S: TrafficStore>(store: &S, daily_limit: u32) -> Result<()> {
    let now = Utc::now();
    report::print_header("TRAFFIC COLLECTION STATUS", now);

    let Some(region) = store.active_region().await? else {
        report::print_no_active_region();
        return Ok(());
    };

    report::print_region(&region, now, daily_limit);

    if should_query_now(region.last_queried_at, region.interval_hours, now) {
        println!("\n Due: the next `collect` run will query {} segments", region.segment_count);
    } else {
        let remaining = hours_remaining(region.last_queried_at, region.interval_hours, now);
        println!("\n Not due: {remaining:.2}h remaining");
    }
    report::print_footer();

    Ok(())
}
