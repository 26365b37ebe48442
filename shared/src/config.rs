use crate::{DecodeFallback, Error, Result, TtlSecs};
use std::str::FromStr;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStoreKind {
    Memory,
    Redis,
}

impl FromStr for CacheStoreKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(CacheStoreKind::Memory),
            "redis" => Ok(CacheStoreKind::Redis),
            other => Err(Error::Config(format!(
                "unsupported cache store type '{other}'. Must be 'memory' or 'redis'"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub http_port: u16,
    pub data_dir: String,
    pub cache_store: CacheStoreKind,
    pub redis_url: String,
    pub cache_prefix: Option<String>,
    pub cache_max_entries: Option<u64>,
    pub user_cache_ttl: TtlSecs,
    pub user_cache_enabled: bool,
    pub decode_fallback: DecodeFallback,
    pub seed_users: usize,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_HTTP_PORT: u16 = 3000;
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
    const DEFAULT_REDIS_PORT: u16 = 6379;
    const DEFAULT_USER_CACHE_TTL_SECS: u64 = 60;

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let ttl_secs = parse_or("STASH_USER_CACHE_TTL_SECS", Self::DEFAULT_USER_CACHE_TTL_SECS);
        let user_cache_ttl = TtlSecs::new(ttl_secs).or_else(|_| {
            warn!(
                "STASH_USER_CACHE_TTL_SECS must be positive, using {}",
                Self::DEFAULT_USER_CACHE_TTL_SECS
            );
            TtlSecs::new(Self::DEFAULT_USER_CACHE_TTL_SECS)
        })?;

        Ok(Self {
            host: std::env::var("STASH_HOST").unwrap_or_else(|_| Self::DEFAULT_HOST.to_string()),
            http_port: parse_or("STASH_HTTP_PORT", Self::DEFAULT_HTTP_PORT),
            data_dir: std::env::var("STASH_DATA_DIR")
                .unwrap_or_else(|_| Self::DEFAULT_DATA_DIR.to_string()),
            cache_store: std::env::var("STASH_CACHE_STORE")
                .unwrap_or_else(|_| "memory".to_string())
                .parse()?,
            redis_url: Self::redis_url_from_env(),
            cache_prefix: std::env::var("STASH_CACHE_PREFIX")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            cache_max_entries: std::env::var("STASH_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| match v.parse::<u64>() {
                    Ok(n) => Some(n),
                    Err(_) => {
                        warn!("Ignoring invalid STASH_CACHE_MAX_ENTRIES '{}'", v);
                        None
                    }
                }),
            user_cache_ttl,
            user_cache_enabled: parse_or("STASH_USER_CACHE_ENABLED", true),
            decode_fallback: match std::env::var("STASH_DECODE_FALLBACK") {
                Ok(v) => v.parse()?,
                Err(_) => DecodeFallback::default(),
            },
            seed_users: parse_or("STASH_SEED_USERS", 0),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// `STASH_REDIS_URL` wins; otherwise the url is assembled from the
    /// conventional `REDIS_HOST` / `REDIS_PORT` / `REDIS_PASSWORD` triple.
    fn redis_url_from_env() -> String {
        if let Ok(url) = std::env::var("STASH_REDIS_URL") {
            return url;
        }

        let host =
            std::env::var("REDIS_HOST").unwrap_or_else(|_| Self::DEFAULT_REDIS_HOST.to_string());
        let port = parse_or("REDIS_PORT", Self::DEFAULT_REDIS_PORT);

        match std::env::var("REDIS_PASSWORD") {
            Ok(password) if !password.is_empty() => format!("redis://:{password}@{host}:{port}/0"),
            _ => format!("redis://{host}:{port}/0"),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for {}, using {}", raw, var, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "STASH_HOST",
        "STASH_HTTP_PORT",
        "STASH_DATA_DIR",
        "STASH_CACHE_STORE",
        "STASH_REDIS_URL",
        "STASH_CACHE_PREFIX",
        "STASH_CACHE_MAX_ENTRIES",
        "STASH_USER_CACHE_TTL_SECS",
        "STASH_USER_CACHE_ENABLED",
        "STASH_DECODE_FALLBACK",
        "STASH_SEED_USERS",
        "REDIS_HOST",
        "REDIS_PORT",
        "REDIS_PASSWORD",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.data_dir, "./data");
        assert_eq!(config.cache_store, CacheStoreKind::Memory);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379/0");
        assert_eq!(config.cache_prefix, None);
        assert_eq!(config.cache_max_entries, None);
        assert_eq!(config.user_cache_ttl.as_secs(), 60);
        assert!(config.user_cache_enabled);
        assert_eq!(config.decode_fallback, DecodeFallback::Recompute);
        assert_eq!(config.seed_users, 0);
    }

    #[test]
    #[serial]
    fn test_redis_url_from_parts() {
        clear_env();
        std::env::set_var("REDIS_HOST", "cache.internal");
        std::env::set_var("REDIS_PORT", "6380");
        std::env::set_var("REDIS_PASSWORD", "s3cret");

        let config = Config::from_env().unwrap();
        assert_eq!(config.redis_url, "redis://:s3cret@cache.internal:6380/0");

        std::env::set_var("STASH_REDIS_URL", "redis://other:6379");
        let config = Config::from_env().unwrap();
        assert_eq!(config.redis_url, "redis://other:6379");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numbers_fall_back() {
        clear_env();
        std::env::set_var("STASH_HTTP_PORT", "not-a-port");
        std::env::set_var("STASH_USER_CACHE_TTL_SECS", "0");
        std::env::set_var("STASH_CACHE_MAX_ENTRIES", "lots");

        let config = Config::from_env().unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.user_cache_ttl.as_secs(), 60);
        assert_eq!(config.cache_max_entries, None);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unknown_store_is_rejected() {
        clear_env();
        std::env::set_var("STASH_CACHE_STORE", "memcached");

        assert!(matches!(Config::from_env(), Err(Error::Config(_))));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        std::env::set_var("STASH_CACHE_STORE", "Redis");
        std::env::set_var("STASH_CACHE_PREFIX", "bench");
        std::env::set_var("STASH_USER_CACHE_ENABLED", "false");
        std::env::set_var("STASH_DECODE_FALLBACK", "fail");
        std::env::set_var("STASH_SEED_USERS", "250");

        let config = Config::from_env().unwrap();
        assert_eq!(config.cache_store, CacheStoreKind::Redis);
        assert_eq!(config.cache_prefix.as_deref(), Some("bench"));
        assert!(!config.user_cache_enabled);
        assert_eq!(config.decode_fallback, DecodeFallback::Fail);
        assert_eq!(config.seed_users, 250);

        clear_env();
    }
}
