// src/distance/model.rs

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// API Response Shape
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MatrixResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    pub status: String,
    #[serde(default)]
    pub duration: Option<ValueField>,
    #[serde(default)]
    pub duration_in_traffic: Option<ValueField>,
    #[serde(default)]
    pub distance: Option<ValueField>,
}

/// `{"text": "...", "value": 123}` pair; only the numeric value is used.
#[derive(Debug, Deserialize)]
pub struct ValueField {
    #[serde(default)]
    pub value: Option<i64>,
}

impl ValueField {
    /// Zero is treated the same as a missing value.
    fn positive(field: &Option<ValueField>) -> Option<i64> {
        field.as_ref().and_then(|f| f.value).filter(|v| *v > 0)
    }
}

// ============================================================================
// Parsed Result
// ============================================================================

/// Travel time for one segment at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelTime {
    /// Road distance in meters.
    pub distance_meters: i64,
    /// Expected travel time without traffic, in seconds.
    pub freeflow_seconds: i64,
    /// Traffic-adjusted travel time for "now", in seconds.
    pub current_seconds: i64,
}

impl TravelTime {
    pub fn delay_seconds(&self) -> i64 {
        self.current_seconds - self.freeflow_seconds
    }

    pub fn congestion_ratio(&self) -> f64 {
        self.current_seconds as f64 / self.freeflow_seconds as f64
    }
}

#[derive(Debug, Error)]
pub enum QueryFailure {
    #[error("quota exceeded")]
    QuotaExceeded,
    #[error("element quota exceeded")]
    ElementQuotaExceeded,
    #[error("API status {status}{}", message_suffix(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
    #[error("element status {0}")]
    ElementStatus(String),
    #[error("response has no matrix element")]
    MissingElement,
    #[error("element is missing duration or distance")]
    MissingFields,
    /// The request URL carries the API key, so it is stripped before storing.
    #[error("request failed: {0}")]
    Transport(reqwest::Error),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<reqwest::Error> for QueryFailure {
    fn from(err: reqwest::Error) -> Self {
        QueryFailure::Transport(err.without_url())
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl MatrixResponse {
    /// Applies the status rules to a decoded response.
    pub fn into_travel_time(self) -> Result<TravelTime, QueryFailure> {
        match self.status.as_str() {
            "OK" => {}
            "OVER_QUERY_LIMIT" => return Err(QueryFailure::QuotaExceeded),
            _ => {
                return Err(QueryFailure::Status {
                    status: self.status,
                    message: self.error_message,
                });
            }
        }

        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or(QueryFailure::MissingElement)?;

        match element.status.as_str() {
            "OK" => {}
            "OVER_QUERY_LIMIT" => return Err(QueryFailure::ElementQuotaExceeded),
            _ => return Err(QueryFailure::ElementStatus(element.status)),
        }

        let freeflow = ValueField::positive(&element.duration);
        let distance = ValueField::positive(&element.distance);
        let (Some(freeflow_seconds), Some(distance_meters)) = (freeflow, distance) else {
            return Err(QueryFailure::MissingFields);
        };

        let current_seconds =
            ValueField::positive(&element.duration_in_traffic).unwrap_or(freeflow_seconds);

        Ok(TravelTime {
            distance_meters,
            freeflow_seconds,
            current_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> Result<TravelTime, QueryFailure> {
        serde_json::from_value::<MatrixResponse>(body)
            .unwrap()
            .into_travel_time()
    }

    fn ok_body(element: serde_json::Value) -> serde_json::Value {
        json!({
            "status": "OK",
            "origin_addresses": ["A"],
            "destination_addresses": ["B"],
            "rows": [{ "elements": [element] }]
        })
    }

    #[test]
    fn current_duration_falls_back_to_freeflow() {
        let travel = parse(ok_body(json!({
            "status": "OK",
            "duration": { "text": "10 mins", "value": 600 },
            "distance": { "text": "5 km", "value": 5000 }
        })))
        .unwrap();

        assert_eq!(travel.freeflow_seconds, 600);
        assert_eq!(travel.current_seconds, 600);
        assert_eq!(travel.distance_meters, 5000);
        assert_eq!(travel.delay_seconds(), 0);
    }

    #[test]
    fn current_duration_prefers_traffic_value() {
        let travel = parse(ok_body(json!({
            "status": "OK",
            "duration": { "value": 600 },
            "duration_in_traffic": { "value": 900 },
            "distance": { "value": 5000 }
        })))
        .unwrap();

        assert_eq!(travel.current_seconds, 900);
        assert_eq!(travel.freeflow_seconds, 600);
        assert_eq!(travel.delay_seconds(), 300);
        assert!((travel.congestion_ratio() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn top_level_quota_is_a_failure() {
        let err = parse(json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "You have exceeded your daily request quota.",
            "rows": []
        }))
        .unwrap_err();
        assert!(matches!(err, QueryFailure::QuotaExceeded));
    }

    #[test]
    fn element_quota_is_a_failure() {
        let err = parse(ok_body(json!({ "status": "OVER_QUERY_LIMIT" }))).unwrap_err();
        assert!(matches!(err, QueryFailure::ElementQuotaExceeded));
    }

    #[test]
    fn other_statuses_carry_their_message() {
        let err = parse(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "API status REQUEST_DENIED: The provided API key is invalid."
        );

        let err = parse(ok_body(json!({ "status": "ZERO_RESULTS" }))).unwrap_err();
        assert!(matches!(err, QueryFailure::ElementStatus(s) if s == "ZERO_RESULTS"));
    }

    #[test]
    fn missing_distance_or_duration_is_a_failure() {
        let err = parse(ok_body(json!({
            "status": "OK",
            "duration": { "value": 600 }
        })))
        .unwrap_err();
        assert!(matches!(err, QueryFailure::MissingFields));

        let err = parse(ok_body(json!({
            "status": "OK",
            "duration": { "value": 0 },
            "distance": { "value": 5000 }
        })))
        .unwrap_err();
        assert!(matches!(err, QueryFailure::MissingFields));
    }

    #[test]
    fn ok_without_rows_is_a_failure() {
        let err = parse(json!({ "status": "OK", "rows": [] })).unwrap_err();
        assert!(matches!(err, QueryFailure::MissingElement));
    }
}
