//! Runtime configuration for the scrim server.

use once_cell::sync::Lazy;
use std::env;

#[derive(Debug)]
pub struct Settings {
    /// HTTP bind address.
    pub server_addr: String,
    /// Postgres URL. `None` runs the server on the in-memory store.
    pub database_url: Option<String>,
    /// Postgres pool size.
    pub db_max_connections: u32,
    /// Token sent as `X-Riot-Token` on rank lookups.
    pub riot_api_key: String,
    /// Host serving account-v1 (regional routing).
    pub riot_account_base_url: String,
    /// Host serving league-v4 (platform routing).
    pub riot_league_base_url: String,
}

impl Settings {
    fn from_env() -> Self {
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty());

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(5);

        let riot_api_key = env::var("RIOT_API_KEY").unwrap_or_default();

        let riot_account_base_url = env::var("RIOT_ACCOUNT_BASE_URL")
            .unwrap_or_else(|_| "https://asia.api.riotgames.com".into());

        let riot_league_base_url = env::var("RIOT_LEAGUE_BASE_URL")
            .unwrap_or_else(|_| "https://kr.api.riotgames.com".into());

        Settings {
            server_addr,
            database_url,
            db_max_connections,
            riot_api_key,
            riot_account_base_url,
            riot_league_base_url,
        }
    }
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
