//! Real-time flow data endpoint for the canyon dashboard.
//!
//! `GET /flow-data?period={24h|7d|30d}` runs the whole pipeline per request:
//! compute the query window, fetch the USGS discharge series and the water
//! temperature concurrently, normalize, and answer with the combined payload.
//!
//! Failure policy: the dashboard never sees a broken chart. Any failure in
//! the pipeline (upstream unreachable, bad status, malformed body, missing
//! series) degrades to a fixed sample dataset with an `error` string, still
//! under HTTP 200. Clients must check `error` to detect degraded data.

use axum::{
    extract::Query, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info};

use crate::models::{FlowDataResponse, FlowPoint, Period};
use crate::{usgs, Config};

// ---

pub fn router() -> Router<Config> {
    // ---
    Router::new().route("/flow-data", get(handler))
}

/// Query parameters for `/flow-data`.
#[derive(Debug, Deserialize)]
struct FlowQuery {
    period: Option<String>,
}

async fn handler(
    Query(params): Query<FlowQuery>,
    State(config): State<Config>,
) -> impl IntoResponse {
    // ---
    info!("GET /flow-data - Starting pipeline");

    let period = Period::parse(params.period.as_deref());

    match fetch_combined(&config, period).await {
        Ok(body) => {
            info!(
                "Pipeline complete, returning {} history points",
                body.flow_history.len()
            );
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!("Falling back to sample flow data: {:#}", e);
            (StatusCode::OK, Json(fallback_response(&config, period, &e))).into_response()
        }
    }
}

// ---

/// Run the happy path: window, concurrent fetches, normalize, combine.
async fn fetch_combined(config: &Config, period: Period) -> anyhow::Result<FlowDataResponse> {
    // ---
    let (start, end) = period.window(Utc::now());
    let client = reqwest::Client::new();

    // Discharge and temperature populate disjoint fields, so the two
    // upstream calls can run together.
    let (series, water_temp) = tokio::join!(
        usgs::fetch_discharge_series(
            &client,
            &config.usgs_base_url,
            &config.site_code,
            start,
            end
        ),
        usgs::fetch_water_temperature(&client, &config.usgs_base_url, &config.site_code),
    );

    let flow = usgs::process_response(&series?)?.ok_or_else(|| {
        anyhow::anyhow!("no discharge readings returned for site {}", config.site_code)
    })?;

    Ok(FlowDataResponse {
        site_name: flow.site_name,
        site_code: flow.site_code,
        current_flow: flow.current_flow,
        water_temp,
        last_updated: flow.last_updated,
        unit: flow.unit,
        flow_history: flow.flow_history,
        period: period.as_str(),
        error: None,
    })
}

/// Fixed sample payload served whenever the pipeline fails.
///
/// The numbers sketch a plausible summer day on the Arkansas so the chart
/// stays readable during an outage; the `error` field is the only signal
/// that they are synthetic.
fn fallback_response(config: &Config, period: Period, cause: &anyhow::Error) -> FlowDataResponse {
    // ---
    const SAMPLE_DAY: [(&str, f64); 12] = [
        ("00:00", 850.0),
        ("02:00", 830.0),
        ("04:00", 820.0),
        ("06:00", 800.0),
        ("08:00", 810.0),
        ("10:00", 840.0),
        ("12:00", 900.0),
        ("14:00", 950.0),
        ("16:00", 980.0),
        ("18:00", 1000.0),
        ("20:00", 980.0),
        ("22:00", 920.0),
    ];

    let now = Utc::now().to_rfc3339();
    let flow_history = SAMPLE_DAY
        .iter()
        .map(|(time, cfs)| FlowPoint {
            time: time.to_string(),
            cfs: *cfs,
            date_time: now.clone(),
        })
        .collect();

    FlowDataResponse {
        site_name: "Arkansas River near Nathrop, CO".to_string(),
        site_code: config.site_code.clone(),
        current_flow: 950.0,
        water_temp: Some(52.0),
        last_updated: now,
        unit: "ft3/s".to_string(),
        flow_history,
        period: period.as_str(),
        error: Some(format!("Failed to fetch real-time data from USGS: {cause:#}")),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn unreachable_config() -> Config {
        // ---
        Config {
            // Port 1 is never listening; connect fails immediately.
            usgs_base_url: "http://127.0.0.1:1/nwis/iv/".to_string(),
            site_code: "07091200".to_string(),
            rapids_csv_url: "http://127.0.0.1:1/rapids.csv".to_string(),
            bind_port: 0,
        }
    }

    #[tokio::test]
    async fn test_unreachable_upstream_errors_out() {
        // ---
        let err = fetch_combined(&unreachable_config(), Period::Day)
            .await
            .expect_err("no upstream listening");

        // The handler turns this into the fallback payload.
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_fallback_shape() {
        // ---
        let config = unreachable_config();
        let cause = anyhow::anyhow!("connection refused");

        let body = fallback_response(&config, Period::Week, &cause);

        assert_eq!(body.flow_history.len(), 12);
        assert_eq!(body.current_flow, 950.0);
        assert_eq!(body.water_temp, Some(52.0));
        assert_eq!(body.unit, "ft3/s");
        assert_eq!(body.period, "7d");
        assert!(body.error.as_deref().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_fallback_serializes_error_field() {
        // ---
        let config = unreachable_config();
        let cause = anyhow::anyhow!("boom");

        let json =
            serde_json::to_value(fallback_response(&config, Period::Day, &cause)).unwrap();

        assert_eq!(json["period"], "24h");
        assert_eq!(json["flowHistory"].as_array().unwrap().len(), 12);
        assert_eq!(json["flowHistory"][0]["time"], "00:00");
        assert_eq!(json["flowHistory"][0]["cfs"], 850.0);
        assert!(json["error"].as_str().unwrap().contains("boom"));
        assert_eq!(json["siteCode"], "07091200");
    }
}
