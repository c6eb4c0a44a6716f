//! Configuration loader for the `browns-canyon-api` backend service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
//!
//! Every variable has a working default so the service boots with no
//! environment at all; the defaults point at the public USGS endpoint and
//! the Nathrop gauge that covers Brown's Canyon.

use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u16 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u16>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Arkansas River near Nathrop, CO — the USGS station covering Brown's Canyon.
const DEFAULT_SITE_CODE: &str = "07091200";

const DEFAULT_USGS_BASE_URL: &str = "https://waterservices.usgs.gov/nwis/iv/";

const DEFAULT_RAPIDS_CSV_URL: &str = "https://hebbkx1anhila5yf.public.blob.vercel-storage.com/Brown_s_Canyon_Rapids__Full_List_%20%281%29-J0E60E4CLJctoB17WXCAWgqps8zTvO.csv";

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// USGS instantaneous-values API base URL.
    pub usgs_base_url: String,

    /// Hydrology monitoring station queried for flow and temperature.
    pub site_code: String,

    /// Hosted CSV with surveyed rapid coordinates.
    pub rapids_csv_url: String,

    /// TCP port the HTTP server binds to.
    pub bind_port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `USGS_BASE_URL` – USGS iv-service base URL (default: public endpoint)
/// - `RIVER_SITE_CODE` – gauge station id (default: 07091200, Nathrop CO)
/// - `RAPIDS_CSV_URL` – rapid coordinates CSV location
/// - `BIND_PORT` – HTTP listen port (default: 8080)
///
/// Returns an error only if a provided value fails to parse.
pub fn load_from_env() -> Result<Config> {
    // ---
    let usgs_base_url = env_or!("USGS_BASE_URL", DEFAULT_USGS_BASE_URL);
    let site_code = env_or!("RIVER_SITE_CODE", DEFAULT_SITE_CODE);
    let rapids_csv_url = env_or!("RAPIDS_CSV_URL", DEFAULT_RAPIDS_CSV_URL);
    let bind_port = parse_env_u16!("BIND_PORT", 8080);

    Ok(Config {
        usgs_base_url,
        site_code,
        rapids_csv_url,
        bind_port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  USGS_BASE_URL   : {}", self.usgs_base_url);
        tracing::info!("  RIVER_SITE_CODE : {}", self.site_code);
        tracing::info!("  RAPIDS_CSV_URL  : {}", self.rapids_csv_url);
        tracing::info!("  BIND_PORT       : {}", self.bind_port);
    }
}
