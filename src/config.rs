//! Environment configuration
//!
//! Every setting has a default so the server starts with a bundled local
//! catalog and an in-memory cache when nothing is configured.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_COMMERCE_BASE_URL: &str = "http://127.0.0.1:8080/wp-json/commerce/v1";
pub const DEFAULT_CACHE_URL: &str = "memory://";
pub const DEFAULT_SESSION_KEY: &str = "default";
/// Carts and their audit entries live for a day
pub const CART_TTL_SECS: u64 = 86_400;
/// Wishlists live for 30 days
pub const WISHLIST_TTL_SECS: u64 = 2_592_000;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Longest accepted duration setting (ten years)
pub const MAX_DURATION_SECS: u64 = 315_360_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value `{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("COMMERCE_CONSUMER_KEY and COMMERCE_CONSUMER_SECRET must be set together")]
    PartialCredentials,
}

/// Where catalog lookups are answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogMode {
    /// In-memory product collection loaded at startup
    Local,
    /// Delegated to the commerce backend
    Remote,
}

/// HTTP basic credentials for the commerce backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub commerce_base_url: String,
    pub credentials: Option<Credentials>,
    pub http_timeout: Duration,
    pub catalog_mode: CatalogMode,
    pub products_file: Option<PathBuf>,
    pub cache_url: String,
    pub default_session_key: String,
    pub cart_ttl: Duration,
    pub wishlist_ttl: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            commerce_base_url: DEFAULT_COMMERCE_BASE_URL.to_string(),
            credentials: None,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            catalog_mode: CatalogMode::Local,
            products_file: None,
            cache_url: DEFAULT_CACHE_URL.to_string(),
            default_session_key: DEFAULT_SESSION_KEY.to_string(),
            cart_ttl: Duration::from_secs(CART_TTL_SECS),
            wishlist_ttl: Duration::from_secs(WISHLIST_TTL_SECS),
        }
    }
}

impl AppConfig {
    /// Reads the process environment, loading a `.env` file first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| {
                invalid("BIND_ADDR", &raw, e.to_string())
            })?,
            None => defaults.bind_addr,
        };

        let credentials = match (get("COMMERCE_CONSUMER_KEY"), get("COMMERCE_CONSUMER_SECRET")) {
            (Some(key), Some(secret)) => Some(Credentials { key, secret }),
            (None, None) => None,
            _ => return Err(ConfigError::PartialCredentials),
        };

        let catalog_mode = match get("CATALOG_MODE").as_deref().map(str::trim) {
            None => defaults.catalog_mode,
            Some(m) if m.eq_ignore_ascii_case("local") => CatalogMode::Local,
            Some(m) if m.eq_ignore_ascii_case("remote") => CatalogMode::Remote,
            Some(other) => {
                return Err(invalid(
                    "CATALOG_MODE",
                    other,
                    "expected `local` or `remote`".into(),
                ))
            }
        };

        Ok(Self {
            bind_addr,
            commerce_base_url: match get("COMMERCE_BASE_URL") {
                Some(raw) => base_url(&raw)?,
                None => defaults.commerce_base_url,
            },
            credentials,
            http_timeout: secs(&get, "COMMERCE_TIMEOUT_SECS", defaults.http_timeout)?,
            catalog_mode,
            products_file: get("PRODUCTS_FILE").map(PathBuf::from),
            cache_url: get("CACHE_URL").unwrap_or(defaults.cache_url),
            default_session_key: get("DEFAULT_SESSION_KEY")
                .map(|k| k.trim().to_string())
                .unwrap_or(defaults.default_session_key),
            cart_ttl: secs(&get, "CART_TTL_SECS", defaults.cart_ttl)?,
            wishlist_ttl: secs(&get, "WISHLIST_TTL_SECS", defaults.wishlist_ttl)?,
        })
    }
}

fn invalid(key: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    }
}

fn base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match reqwest::Url::parse(trimmed) {
        Ok(url) if !url.cannot_be_a_base() && matches!(url.scheme(), "http" | "https") => {
            Ok(trimmed.to_string())
        }
        Ok(_) => Err(invalid(
            "COMMERCE_BASE_URL",
            raw,
            "expected an http(s) URL".into(),
        )),
        Err(e) => Err(invalid("COMMERCE_BASE_URL", raw, e.to_string())),
    }
}

fn secs<G>(get: &G, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(raw) = get(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid(key, &raw, "must be greater than zero".into())),
        Ok(n) if n > MAX_DURATION_SECS => Err(invalid(
            key,
            &raw,
            format!("must be at most {MAX_DURATION_SECS} seconds"),
        )),
        Ok(n) => Ok(Duration::from_secs(n)),
        Err(e) => Err(invalid(key, &raw, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.catalog_mode, CatalogMode::Local);
        assert_eq!(config.cache_url, "memory://");
        assert_eq!(config.cart_ttl, Duration::from_secs(86_400));
        assert_eq!(config.wishlist_ttl, Duration::from_secs(2_592_000));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("COMMERCE_BASE_URL", "https://shop.example/api/"),
            ("CATALOG_MODE", "Remote"),
            ("COMMERCE_TIMEOUT_SECS", "3"),
            ("COMMERCE_CONSUMER_KEY", "ck"),
            ("COMMERCE_CONSUMER_SECRET", "cs"),
        ]))
        .unwrap();

        assert_eq!(config.commerce_base_url, "https://shop.example/api");
        assert_eq!(config.catalog_mode, CatalogMode::Remote);
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.credentials.unwrap().key, "ck");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("CATALOG_MODE", "hybrid")])),
            Err(ConfigError::Invalid { key: "CATALOG_MODE", .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("CART_TTL_SECS", "0")])),
            Err(ConfigError::Invalid { key: "CART_TTL_SECS", .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("COMMERCE_CONSUMER_KEY", "ck")])),
            Err(ConfigError::PartialCredentials)
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("COMMERCE_BASE_URL", "shop.example/api")])),
            Err(ConfigError::Invalid { key: "COMMERCE_BASE_URL", .. })
        ));
    }

    #[test]
    fn rejects_durations_too_large_to_schedule() {
        for key in ["CART_TTL_SECS", "WISHLIST_TTL_SECS", "COMMERCE_TIMEOUT_SECS"] {
            let result = AppConfig::from_lookup(lookup(&[(key, "18446744073709551615")]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { key: k, .. }) if k == key),
                "{key}"
            );
        }

        let ceiling = MAX_DURATION_SECS.to_string();
        let config = AppConfig::from_lookup(lookup(&[("CART_TTL_SECS", ceiling.as_str())])).unwrap();
        assert_eq!(config.cart_ttl, Duration::from_secs(MAX_DURATION_SECS));
    }
}
