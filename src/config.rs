//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::DEFAULT_CATEGORY_TTL;
use crate::domain::DEFAULT_LOW_STOCK_THRESHOLD;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Directory for collection snapshots; None keeps data in memory only
    pub data_dir: Option<PathBuf>,
    /// Absolute expiration of cached categories, in seconds
    pub category_cache_ttl: u64,
    /// Background cache sweep interval in seconds
    pub cache_cleanup_interval: u64,
    /// Stock strictly below this is reported as low
    pub low_stock_threshold: i32,
    /// Identity provider userinfo endpoint; None disables authentication
    pub auth_userinfo_url: Option<String>,
    /// Seconds a verified bearer token stays cached
    pub auth_cache_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 5000)
    /// - `DATA_DIR` - Snapshot directory (default: unset, in-memory)
    /// - `CATEGORY_CACHE_TTL` - Category cache TTL in seconds (default: 900)
    /// - `CACHE_CLEANUP_INTERVAL` - Cache sweep frequency in seconds (default: 60)
    /// - `LOW_STOCK_THRESHOLD` - Low stock threshold (default: 10)
    /// - `AUTH_USERINFO_URL` - OIDC userinfo endpoint (default: unset, auth disabled)
    /// - `AUTH_CACHE_TTL` - Verified token cache TTL in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            data_dir: non_empty_var("DATA_DIR").map(PathBuf::from),
            category_cache_ttl: parse_var("CATEGORY_CACHE_TTL")
                .unwrap_or(defaults.category_cache_ttl),
            cache_cleanup_interval: parse_var("CACHE_CLEANUP_INTERVAL")
                .unwrap_or(defaults.cache_cleanup_interval),
            low_stock_threshold: parse_var("LOW_STOCK_THRESHOLD")
                .unwrap_or(defaults.low_stock_threshold),
            auth_userinfo_url: non_empty_var("AUTH_USERINFO_URL"),
            auth_cache_ttl: parse_var("AUTH_CACHE_TTL").unwrap_or(defaults.auth_cache_ttl),
        }
    }

    pub fn auth_enabled(&self) -> bool {
        self.auth_userinfo_url.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 5000,
            data_dir: None,
            category_cache_ttl: DEFAULT_CATEGORY_TTL,
            cache_cleanup_interval: 60,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            auth_userinfo_url: None,
            auth_cache_ttl: 60,
        }
    }
}
