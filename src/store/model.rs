// src/store/model.rs

use chrono::{DateTime, Utc};
use geo_types::Point;

/// The region currently flagged active in `collection_config`, with its policy.
#[derive(Debug, Clone)]
pub struct ActiveRegion {
    pub region_id: i32,
    pub region_name: Option<String>,
    pub queries_per_day: i32,
    pub interval_hours: f64,
    pub last_queried_at: Option<DateTime<Utc>>,
    pub segment_count: i32,
}

impl ActiveRegion {
    pub fn display_name(&self) -> String {
        match self.region_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Region {}", self.region_id),
        }
    }

    /// Elements the current policy would spend per day.
    pub fn projected_daily_elements(&self) -> i64 {
        i64::from(self.segment_count) * i64::from(self.queries_per_day)
    }
}

/// A directed road stretch. Points are `(x = lng, y = lat)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    pub segment_id: i32,
    pub start: Point<f64>,
    pub end: Point<f64>,
}

/// One row of `traffic_observations`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub segment_id: i32,
    pub region_id: i32,
    pub observed_at: DateTime<Utc>,
    pub freeflow_seconds: i64,
    pub current_seconds: i64,
}

/// One row of `query_log`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLogEntry {
    pub region_id: i32,
    pub elements_queried: i32,
    pub successful_queries: i32,
    pub failed_queries: i32,
    pub api_response_time_ms: i64,
}

/// Everything a collection pass writes, applied in a single transaction.
#[derive(Debug, Clone)]
pub struct RunBatch {
    /// `(segment_id, distance_meters)` for every successful segment.
    pub distance_updates: Vec<(i32, i64)>,
    pub observations: Vec<Observation>,
    pub log: QueryLogEntry,
}
