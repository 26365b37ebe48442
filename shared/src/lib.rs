// shared/src/lib.rs

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("not found")]
    NotFound,
    #[error("invalid cache key: {0}")]
    InvalidKey(String),
    #[error("ttl must be a positive number of seconds")]
    InvalidTtl,
    #[error("store: {0}")]
    Store(String),
    #[error("serialization: {0}")]
    Serialization(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Time-to-live of a stored entry, in whole seconds. Never zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TtlSecs(u64);

impl TtlSecs {
    pub fn new(secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(Error::InvalidTtl);
        }
        Ok(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl From<TtlSecs> for Duration {
    fn from(ttl: TtlSecs) -> Self {
        ttl.as_duration()
    }
}

impl fmt::Display for TtlSecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// What to do with a stored entry that cannot be decoded into the requested type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DecodeFallback {
    /// Treat the entry as a miss and overwrite it with a fresh computation.
    #[default]
    Recompute,
    /// Hand the stored bytes back as a JSON string, if the target type accepts one.
    Raw,
    /// Surface the decode error to the caller.
    Fail,
}

impl FromStr for DecodeFallback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "recompute" => Ok(DecodeFallback::Recompute),
            "raw" => Ok(DecodeFallback::Raw),
            "fail" => Ok(DecodeFallback::Fail),
            other => Err(Error::Config(format!(
                "unknown decode fallback '{other}'. Must be 'recompute', 'raw' or 'fail'"
            ))),
        }
    }
}

pub mod config;
