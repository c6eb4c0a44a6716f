//! Rapid catalog endpoints: detail lookups, coordinate enrichment, and the
//! Google Earth canyon tour link.
//!
//! Sibling module in the `routes` directory (EMBP): handlers and response
//! types stay private here and only the subrouter is exported to the gateway.

use axum::{
    extract::Path, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json,
    Router,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::Rapid;
use crate::{earth, rapids, Config};

// ---

pub fn router() -> Router<Config> {
    // ---
    Router::new()
        .route("/rapids/coordinates", get(coordinates))
        .route("/rapids/earth-link", get(earth_link))
        .route("/rapids/{id}", get(detail))
}

/// Rapid detail plus its map deep link.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RapidDetail {
    // ---
    #[serde(flatten)]
    rapid: Rapid,
    earth_url: String,
}

#[derive(Serialize)]
struct ErrorBody {
    // ---
    error: &'static str,
}

/// Handle `GET /rapids/{id}`.
async fn detail(Path(id): Path<String>) -> impl IntoResponse {
    // ---
    match rapids::find(&id) {
        Some(rapid) => {
            let earth_url = earth::rapid_url(&rapid);
            (StatusCode::OK, Json(RapidDetail { rapid, earth_url })).into_response()
        }
        None => {
            info!("GET /rapids/{} - not in catalog", id);
            (
                StatusCode::NOT_FOUND,
                Json(ErrorBody { error: "Rapid not found" }),
            )
                .into_response()
        }
    }
}

/// Handle `GET /rapids/coordinates`.
///
/// Returns the full catalog with GPS coordinates joined on from the hosted
/// CSV. A failed CSV fetch degrades to the bare catalog rather than an
/// error; the map still renders, just without precise placements.
async fn coordinates(State(config): State<Config>) -> impl IntoResponse {
    // ---
    Json(enriched_catalog(&config).await)
}

/// Handle `GET /rapids/earth-link`.
///
/// One URL opening Google Earth Web with every placed rapid as a waypoint.
async fn earth_link(State(config): State<Config>) -> impl IntoResponse {
    // ---
    let rapids = enriched_catalog(&config).await;
    Json(serde_json::json!({ "url": earth::all_rapids_url(&rapids) }))
}

// ---

async fn enriched_catalog(config: &Config) -> Vec<Rapid> {
    // ---
    let client = reqwest::Client::new();

    match rapids::fetch_coordinates(&client, &config.rapids_csv_url).await {
        Ok(coordinates) => rapids::with_coordinates(rapids::catalog(), &coordinates),
        Err(e) => {
            warn!("Serving catalog without coordinates: {:#}", e);
            rapids::catalog()
        }
    }
}
