use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite URL of the snapshot store. `None` keeps snapshots in memory.
    pub database_url: Option<String>,
    pub candidates_csv: String,
    pub resume_assets_path: String,
    pub upload_tick: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            candidates_csv: "data/candidates_data.csv".to_string(),
            resume_assets_path: "/resumes".to_string(),
            upload_tick: Duration::from_millis(200),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let upload_tick = match optional("UPLOAD_TICK_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse::<u64>()
                    .context("UPLOAD_TICK_MS must be a whole number of milliseconds")?,
            ),
            None => defaults.upload_tick,
        };
        let port = match optional("PORT") {
            Some(port) => port
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            None => defaults.port,
        };

        Ok(Config {
            database_url: optional("DATABASE_URL"),
            candidates_csv: optional("CANDIDATES_CSV").unwrap_or(defaults.candidates_csv),
            resume_assets_path: optional("RESUME_ASSETS_PATH")
                .unwrap_or(defaults.resume_assets_path),
            upload_tick,
            port,
            rust_log: optional("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}
