// src/config.rs

use crate::recommend::ScoringConfig;
use dotenvy::dotenv;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub addr: SocketAddr,
    pub db_path: String,
    pub schema_path: String,
    pub seed_path: String,
    pub workers: usize,
    /// Load `seed_path` into an empty database on start.
    pub seed: bool,
    /// Stored as the map provider token when set.
    pub map_token: Option<String>,
    pub scoring: ScoringConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            db_path: "homefinder.sqlite3".to_string(),
            schema_path: "sql/schema.sql".to_string(),
            seed_path: "sql/seed.sql".to_string(),
            workers: 8,
            seed: true,
            map_token: None,
            scoring: ScoringConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables. Unset variables take
    /// the default; unreadable ones do too, with a warning.
    pub fn from_env() -> Self {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let scoring = ScoringConfig {
            baseline: parse_or(&var, "HOMEFINDER_SCORE_BASELINE", defaults.scoring.baseline),
            normal_floor: parse_or(&var, "HOMEFINDER_SCORE_NORMAL_FLOOR", defaults.scoring.normal_floor),
            fallback_min: parse_or(&var, "HOMEFINDER_SCORE_FALLBACK_MIN", defaults.scoring.fallback_min),
            fallback_max: parse_or(&var, "HOMEFINDER_SCORE_FALLBACK_MAX", defaults.scoring.fallback_max),
            location_penalty: parse_or(
                &var,
                "HOMEFINDER_SCORE_LOCATION_PENALTY",
                defaults.scoring.location_penalty,
            ),
            amenity_penalty: parse_or(
                &var,
                "HOMEFINDER_SCORE_AMENITY_PENALTY",
                defaults.scoring.amenity_penalty,
            ),
            hard_miss_penalty: parse_or(
                &var,
                "HOMEFINDER_SCORE_HARD_MISS_PENALTY",
                defaults.scoring.hard_miss_penalty,
            ),
        }
        .validated();

        let workers = parse_or(&var, "HOMEFINDER_WORKERS", defaults.workers);

        Self {
            addr: parse_or(&var, "HOMEFINDER_ADDR", defaults.addr),
            db_path: var("HOMEFINDER_DB_PATH").unwrap_or(defaults.db_path),
            schema_path: var("HOMEFINDER_SCHEMA_PATH").unwrap_or(defaults.schema_path),
            seed_path: var("HOMEFINDER_SEED_PATH").unwrap_or(defaults.seed_path),
            workers: if workers == 0 { defaults.workers } else { workers },
            seed: var("HOMEFINDER_SEED").map_or(defaults.seed, |v| {
                !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
            }),
            map_token: var("HOMEFINDER_MAP_TOKEN"),
            scoring,
        }
    }
}

fn parse_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match var(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "unreadable config value, using default");
            default
        }),
    }
}
