// src/collect/report.rs

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::collect::model::CollectionSummary;
use crate::config::{BANNER_WIDTH, FOOTER_WIDTH};
use crate::gate::hours_since;
use crate::store::ActiveRegion;
use crate::utils::rule;

pub fn print_header(title: &str, now: DateTime<Utc>) {
    println!("{}", rule(BANNER_WIDTH));
    println!("{title}");
    println!("Time: {} UTC", now.format("%Y-%m-%d %H:%M:%S"));
    println!("{}", rule(BANNER_WIDTH));
}

pub fn print_footer() {
    println!("{}", rule(FOOTER_WIDTH));
}

pub fn print_no_active_region() {
    println!("No active region configured.");
    println!("Flag a region with collection_config.is_active = TRUE to start collecting.");
}

/// Region banner shown before the interval gate is evaluated.
pub fn print_region(region: &ActiveRegion, now: DateTime<Utc>, daily_limit: u32) {
    println!("\n Active Region: {}", region.display_name());
    println!("   Region ID: {}", region.region_id);
    println!("   Segments: {}", region.segment_count);
    println!("   Target: {} queries/day", region.queries_per_day);
    println!("   Interval: Every {:.2} hours", region.interval_hours);

    match region.last_queried_at {
        Some(last) => println!(
            "   Last queried: {} UTC ({:.2}h ago)",
            last.format("%Y-%m-%d %H:%M:%S"),
            hours_since(last, now)
        ),
        None => println!("   Last queried: Never"),
    }

    let projected = region.projected_daily_elements();
    if projected > i64::from(daily_limit) {
        println!("   ⚠ Projected {projected} elements/day exceeds the soft limit of {daily_limit}");
        warn!(
            region_id = region.region_id,
            projected,
            daily_limit,
            "collection policy exceeds daily element limit"
        );
    }
}

pub fn print_skip(hours_since: f64, interval_hours: f64, hours_remaining: f64) {
    println!("\n⏭️ SKIPPING: Too soon since last query");
    println!("   Time since last: {hours_since:.2}h");
    println!("   Required interval: {interval_hours:.2}h");
    println!("   Time remaining: {hours_remaining:.2}h");
}

pub fn print_complete(summary: &CollectionSummary) {
    println!("{}", "-".repeat(FOOTER_WIDTH));
    println!("\n✅ COLLECTION COMPLETE!");
    println!("   Successful queries: {}", summary.successful);
    println!("   Failed queries: {}", summary.failed);
    match summary.success_rate() {
        Some(rate) => println!("   Success rate: {rate:.1}%"),
        None => println!("   Success rate: n/a (no segments)"),
    }
}
