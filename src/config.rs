//! Runtime configuration loaded from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | required |
//! | `DATABASE_MAX_CONNECTIONS` | `10` |
//! | `SERVER_HOST` | `0.0.0.0` |
//! | `SERVER_PORT` | `3000` |
//! | `COINGECKO_BASE_URL` | `https://api.coingecko.com/api/v3` |
//! | `UPSTREAM_TIMEOUT_SECS` | `10` |
//! | `TRACKED_COINS` | comma-separated CoinGecko ids, see [`DEFAULT_TRACKED_COINS`] |

use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Coins listed on the trading page when `TRACKED_COINS` is unset.
pub const DEFAULT_TRACKED_COINS: &[&str] = &[
    "bitcoin",
    "ethereum",
    "tether",
    "ripple",
    "binancecoin",
    "solana",
    "usd-coin",
    "tron",
    "dogecoin",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub coingecko_base_url: String,
    pub upstream_timeout: Duration,
    pub tracked_coins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?;

        let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 10)?;
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = parse_var("SERVER_PORT", 3000)?;
        let coingecko_base_url = env::var("COINGECKO_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_COINGECKO_BASE_URL.to_string());

        let timeout_secs: u64 = parse_var("UPSTREAM_TIMEOUT_SECS", 10)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "UPSTREAM_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let tracked_coins = match env::var("TRACKED_COINS") {
            Ok(raw) => parse_coin_list(&raw)?,
            Err(_) => DEFAULT_TRACKED_COINS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            server_host,
            server_port,
            coingecko_base_url,
            upstream_timeout: Duration::from_secs(timeout_secs),
            tracked_coins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

pub(crate) fn parse_coin_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let coins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if coins.is_empty() {
        return Err(ConfigError::InvalidValue(
            "TRACKED_COINS".to_string(),
            "at least one coin id is required".to_string(),
        ));
    }
    Ok(coins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coin_list_trims_and_lowercases() {
        let coins = parse_coin_list(" Bitcoin, ethereum ,,solana").unwrap();
        assert_eq!(coins, vec!["bitcoin", "ethereum", "solana"]);
    }

    #[test]
    fn test_parse_coin_list_rejects_empty() {
        assert!(parse_coin_list(" , ").is_err());
    }

    #[test]
    fn test_default_coins_include_bitcoin_first() {
        assert_eq!(DEFAULT_TRACKED_COINS[0], "bitcoin");
        assert_eq!(DEFAULT_TRACKED_COINS.len(), 9);
    }
}
