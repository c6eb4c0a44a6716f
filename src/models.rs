//! Shared data models for the river API.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ---

/// Chart window requested by the client for `/flow-data`.
///
/// Unrecognized period tokens silently fall back to [`Period::Day`];
/// the dashboard would rather show a day of data than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    // ---
    Day,
    Week,
    Month,
}

impl Period {
    // ---
    pub fn parse(token: Option<&str>) -> Self {
        // ---
        match token {
            Some("7d") => Period::Week,
            Some("30d") => Period::Month,
            _ => Period::Day,
        }
    }

    /// Compute the query window ending at `end`.
    pub fn window(&self, end: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        // ---
        let offset = match self {
            Period::Day => Duration::days(1),
            Period::Week => Duration::days(7),
            Period::Month => Duration::days(30),
        };
        (end - offset, end)
    }

    pub fn as_str(&self) -> &'static str {
        // ---
        match self {
            Period::Day => "24h",
            Period::Week => "7d",
            Period::Month => "30d",
        }
    }
}

/// One point of the flow chart: local clock label, discharge in CFS, and the
/// full upstream timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPoint {
    // ---
    pub time: String,
    pub cfs: f64,
    pub date_time: String,
}

/// Flattened flow snapshot produced from one USGS time-series response.
///
/// `flow_history` is in chronological (ascending) order and `current_flow`
/// is the reading with the maximum timestamp.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFlow {
    // ---
    pub site_name: String,
    pub site_code: String,
    pub current_flow: f64,
    pub last_updated: String,
    pub unit: String,
    pub flow_history: Vec<FlowPoint>,
}

/// Response body for `GET /flow-data`.
///
/// Always served with HTTP 200. On upstream failure the payload carries a
/// fixed sample history and `error` is set; clients must check `error` to
/// detect degraded data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDataResponse {
    // ---
    pub site_name: String,
    pub site_code: String,
    pub current_flow: f64,
    pub water_temp: Option<f64>,
    pub last_updated: String,
    pub unit: String,
    pub flow_history: Vec<FlowPoint>,
    pub period: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A named rapid in the canyon.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rapid {
    // ---
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "class")]
    pub rating: &'static str,
    pub position: MapPosition,
    pub description: &'static str,
    pub notes: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Percentage-based position on the stylized river map.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MapPosition {
    // ---
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Coordinates {
    // ---
    pub latitude: f64,
    pub longitude: f64,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_period_parse_known_tokens() {
        // ---
        assert_eq!(Period::parse(Some("24h")), Period::Day);
        assert_eq!(Period::parse(Some("7d")), Period::Week);
        assert_eq!(Period::parse(Some("30d")), Period::Month);
    }

    #[test]
    fn test_period_parse_falls_back_to_day() {
        // ---
        assert_eq!(Period::parse(None), Period::Day);
        assert_eq!(Period::parse(Some("")), Period::Day);
        assert_eq!(Period::parse(Some("90d")), Period::Day);
        assert_eq!(Period::parse(Some("7D")), Period::Day);
    }

    #[test]
    fn test_week_window_is_seven_days() {
        // ---
        let end = Utc::now();
        let (start, window_end) = Period::Week.window(end);

        assert_eq!(window_end, end);
        assert_eq!((end - start).num_seconds(), 7 * 86_400);
    }

    #[test]
    fn test_unknown_token_window_matches_day() {
        // ---
        let end = Utc::now();
        let (fallback_start, _) = Period::parse(Some("bogus")).window(end);
        let (day_start, _) = Period::Day.window(end);

        assert_eq!(fallback_start, day_start);
    }

    #[test]
    fn test_period_round_trip_strings() {
        // ---
        for token in ["24h", "7d", "30d"] {
            assert_eq!(Period::parse(Some(token)).as_str(), token);
        }
    }
}
