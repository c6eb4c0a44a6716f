use axum::Router;

use crate::Config;

mod flow_data;
mod health;
mod rapids;

// ---

pub fn router(config: Config) -> Router {
    // ---
    Router::new()
        .merge(flow_data::router())
        .merge(rapids::router())
        .merge(health::router())
        .with_state(config)
}
