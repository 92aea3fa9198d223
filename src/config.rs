// src/config.rs

// ============================================================================
// Distance Matrix API
// ============================================================================

/// Default travel-time matrix endpoint. Overridable with `DISTANCE_MATRIX_API_URL`.
pub const DISTANCE_MATRIX_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Pause between consecutive segment queries (crude rate limiting).
pub const REQUEST_DELAY_MS: u64 = 200;

/// Soft ceiling on elements per day. The worst case quota is ~1129, so stop short.
pub const DAILY_ELEMENT_LIMIT: u32 = 1100;

// ============================================================================
// Environment
// ============================================================================

pub const ENV_DB_CONNECTION: &str = "DB_CONNECTION_STRING";
pub const ENV_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_API_URL: &str = "DISTANCE_MATRIX_API_URL";

// ============================================================================
// Report formatting
// ============================================================================

pub const BANNER_WIDTH: usize = 60;
pub const FOOTER_WIDTH: usize = 80;
