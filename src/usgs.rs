//! USGS instantaneous-values API client and response normalizer.
//!
//! The NWIS "iv" service (https://waterservices.usgs.gov/nwis/iv/) returns a
//! deeply nested JSON document with one time series per requested parameter
//! code and every measured value as a string. This module owns the raw schema
//! types, the query-string timestamp format, and the flattening of a raw
//! series into the chart-ready [`ProcessedFlow`] shape.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{FlowPoint, ProcessedFlow};

// ---

/// NWIS parameter code for discharge (cubic feet per second).
pub const PARAM_DISCHARGE: &str = "00060";

/// NWIS parameter code for water temperature (degrees Celsius).
pub const PARAM_WATER_TEMP: &str = "00010";

/// Trailing window used when probing for a recent temperature reading.
const TEMP_LOOKBACK_HOURS: i64 = 2;

// ---
// Raw NWIS response structures. Only the fields the normalizer reads are
// declared; serde ignores the rest of the document.

#[derive(Debug, Deserialize)]
pub struct TimeSeriesResponse {
    // ---
    pub value: TimeSeriesDocument,
}

#[derive(Debug, Deserialize)]
pub struct TimeSeriesDocument {
    // ---
    #[serde(rename = "timeSeries")]
    pub time_series: Vec<TimeSeries>,
}

#[derive(Debug, Deserialize)]
pub struct TimeSeries {
    // ---
    #[serde(rename = "sourceInfo")]
    pub source_info: SourceInfo,
    pub variable: Variable,
    pub values: Vec<ValueBlock>,
}

#[derive(Debug, Deserialize)]
pub struct SourceInfo {
    // ---
    #[serde(rename = "siteName")]
    pub site_name: String,
    #[serde(rename = "siteCode", default)]
    pub site_code: Vec<SiteCode>,
}

#[derive(Debug, Deserialize)]
pub struct SiteCode {
    // ---
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct Variable {
    // ---
    pub unit: Unit,
}

#[derive(Debug, Deserialize)]
pub struct Unit {
    // ---
    #[serde(rename = "unitCode")]
    pub unit_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ValueBlock {
    // ---
    #[serde(default)]
    pub value: Vec<Reading>,
}

/// One timestamped measurement as delivered upstream. The measured value is
/// a string in the wire format.
#[derive(Debug, Deserialize)]
pub struct Reading {
    // ---
    pub value: String,
    #[serde(rename = "dateTime")]
    pub date_time: String,
    #[serde(default)]
    pub qualifiers: Vec<String>,
}

// ---

/// Render a timestamp in the format the NWIS query string expects:
/// seconds precision, no fractional part, trailing `Z`.
pub fn format_timestamp(dt: DateTime<Utc>) -> String {
    // ---
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Flatten a raw NWIS response into a [`ProcessedFlow`] snapshot.
///
/// Returns `Ok(None)` when the expected series is absent or carries no
/// readings; that is a valid upstream answer, not an error. Malformed
/// numeric text or timestamps are hard errors so that garbage never lands
/// in chart data as a NaN.
///
/// The most recent reading becomes `current_flow`/`last_updated`;
/// `flow_history` is the full series in chronological order with a local
/// `HH:MM` label per point (local to the gauge's reported UTC offset).
pub fn process_response(data: &TimeSeriesResponse) -> Result<Option<ProcessedFlow>> {
    // ---
    let Some(series) = data.value.time_series.first() else {
        return Ok(None);
    };

    let site_name = series.source_info.site_name.clone();
    let site_code = series
        .source_info
        .site_code
        .first()
        .map(|c| c.value.clone())
        .unwrap_or_default();
    let unit = series.variable.unit.unit_code.clone();

    let readings = series.values.first().map(|b| b.value.as_slice()).unwrap_or(&[]);
    if readings.is_empty() {
        return Ok(None);
    }

    // Parse everything up front so a bad reading fails the whole response.
    let mut parsed: Vec<(DateTime<FixedOffset>, f64, &Reading)> = readings
        .iter()
        .map(|r| {
            let at = DateTime::parse_from_rfc3339(&r.date_time)
                .with_context(|| format!("unparseable reading timestamp '{}'", r.date_time))?;
            let cfs: f64 = r
                .value
                .parse()
                .with_context(|| format!("unparseable reading value '{}'", r.value))?;
            Ok((at, cfs, r))
        })
        .collect::<Result<_>>()?;

    // Newest first, so the current reading is parsed[0].
    parsed.sort_by(|a, b| b.0.cmp(&a.0));

    let current_flow = parsed[0].1;
    let last_updated = parsed[0].2.date_time.clone();

    let flow_history = parsed
        .iter()
        .rev()
        .map(|(at, cfs, r)| FlowPoint {
            time: at.format("%H:%M").to_string(),
            cfs: *cfs,
            date_time: r.date_time.clone(),
        })
        .collect();

    Ok(Some(ProcessedFlow {
        site_name,
        site_code,
        current_flow,
        last_updated,
        unit,
        flow_history,
    }))
}

// ---

/// Fetch the raw discharge series for a site over `[start, end]`.
///
/// Errors (network, non-success status, undecodable body) propagate to the
/// caller; the `/flow-data` handler converts them into its fallback payload.
pub async fn fetch_discharge_series(
    client: &reqwest::Client,
    base_url: &str,
    site_code: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<TimeSeriesResponse> {
    // ---
    let url = format!(
        "{}?format=json&sites={}&parameterCd={}&startDT={}&endDT={}",
        base_url,
        site_code,
        PARAM_DISCHARGE,
        format_timestamp(start),
        format_timestamp(end),
    );

    debug!("Fetching discharge series from: {}", url);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!("USGS API error: {}", response.status()));
    }

    Ok(response.json().await?)
}

/// Fetch the latest water temperature for a site, in Fahrenheit rounded to
/// one decimal place.
///
/// Probes the last two hours of parameter `00010`. Every failure path —
/// network error, bad status, unexpected shape, no readings in the window —
/// collapses to `None`; temperature is garnish on the flow dashboard and
/// must never take it down.
pub async fn fetch_water_temperature(
    client: &reqwest::Client,
    base_url: &str,
    site_code: &str,
) -> Option<f64> {
    // ---
    match try_fetch_water_temperature(client, base_url, site_code).await {
        Ok(temp) => temp,
        Err(e) => {
            warn!("Water temperature fetch failed: {}", e);
            None
        }
    }
}

async fn try_fetch_water_temperature(
    client: &reqwest::Client,
    base_url: &str,
    site_code: &str,
) -> Result<Option<f64>> {
    // ---
    let end = Utc::now();
    let start = end - Duration::hours(TEMP_LOOKBACK_HOURS);

    let url = format!(
        "{}?format=json&sites={}&parameterCd={}&startDT={}&endDT={}",
        base_url,
        site_code,
        PARAM_WATER_TEMP,
        format_timestamp(start),
        format_timestamp(end),
    );

    debug!("Fetching water temperature from: {}", url);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!("USGS API error: {}", response.status()));
    }

    let data: TimeSeriesResponse = response.json().await?;

    // The iv service returns readings in chronological order; the last one
    // in the window is the latest.
    let latest = data
        .value
        .time_series
        .first()
        .and_then(|s| s.values.first())
        .and_then(|b| b.value.last());

    let Some(reading) = latest else {
        debug!("No temperature readings in the last {}h window", TEMP_LOOKBACK_HOURS);
        return Ok(None);
    };

    let celsius: f64 = reading
        .value
        .parse()
        .with_context(|| format!("unparseable temperature value '{}'", reading.value))?;

    Ok(Some(celsius_to_fahrenheit(celsius)))
}

/// °C → °F, rounded to one decimal place for display.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    // ---
    let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
    (fahrenheit * 10.0).round() / 10.0
}
