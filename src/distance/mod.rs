// src/distance/mod.rs

pub mod model;

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use geo_types::Point;
use reqwest::Client;
use url::Url;

pub use model::{QueryFailure, TravelTime};

use crate::distance::model::MatrixResponse;

/// Anything that can answer "how long does it take to drive from A to B right now".
#[async_trait]
pub trait TravelTimeSource: Send + Sync {
    async fn travel_time(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
    ) -> Result<TravelTime, QueryFailure>;
}

/// Formats a point the way the matrix API expects it: `"lat,lng"`.
pub fn lat_lng(point: Point<f64>) -> String {
    format!("{},{}", point.y(), point.x())
}

// ============================================================================
// Distance Matrix Client
// ============================================================================

pub struct DistanceMatrixClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl DistanceMatrixClient {
    pub fn new(base_url: Url, api_key: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl TravelTimeSource for DistanceMatrixClient {
    async fn travel_time(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
    ) -> Result<TravelTime, QueryFailure> {
        let origins = lat_lng(origin);
        let destinations = lat_lng(destination);
        let params = [
            ("origins", origins.as_str()),
            ("destinations", destinations.as_str()),
            ("mode", "driving"),
            ("departure_time", "now"),
            ("traffic_model", "best_guess"),
            ("key", self.api_key.as_str()),
        ];

        let resp = self
            .http
            .get(self.base_url.clone())
            .query(&params)
            .send()
            .await?;

        // The API reports failures in the body, so the HTTP status is not checked.
        let body = resp.bytes().await?;
        let parsed: MatrixResponse = serde_json::from_slice(&body)?;

        parsed.into_travel_time()
    }
}
