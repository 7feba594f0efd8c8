//! Runtime configuration.
//!
//! Durations are human-readable strings (`"10m"`, `"250ms"`) both in
//! serialized config and in environment variables.

use serde::{Deserialize, Deserializer};
use std::time::Duration;

use crate::RuntimeError;

pub const ENV_CACHE_CAPACITY: &str = "LEXGUARD_CACHE_CAPACITY";
pub const ENV_CACHE_TTL: &str = "LEXGUARD_CACHE_TTL";
pub const ENV_DEADLINE: &str = "LEXGUARD_DEADLINE";

const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// Configuration for [`RuntimeValidator`](crate::RuntimeValidator).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum cached results; 0 disables caching
    pub cache_capacity: u64,

    /// How long a cached result stays valid
    #[serde(deserialize_with = "deserialize_duration")]
    pub cache_ttl: Duration,

    /// Default deadline for a whole validation call
    #[serde(deserialize_with = "deserialize_optional_duration")]
    pub deadline: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_ttl: DEFAULT_CACHE_TTL,
            deadline: None,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `LEXGUARD_*` environment variables.
    pub fn from_env() -> Result<Self, RuntimeError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RuntimeError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_CACHE_CAPACITY) {
            config.cache_capacity = value.trim().parse().map_err(|_| {
                RuntimeError::InvalidConfig(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_CACHE_CAPACITY, value
                ))
            })?;
        }

        if let Some(value) = lookup(ENV_CACHE_TTL) {
            config.cache_ttl = parse_duration(ENV_CACHE_TTL, &value)?;
        }

        if let Some(value) = lookup(ENV_DEADLINE) {
            config.deadline = Some(parse_duration(ENV_DEADLINE, &value)?);
        }

        Ok(config)
    }

    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

fn parse_duration(name: &str, value: &str) -> Result<Duration, RuntimeError> {
    humantime::parse_duration(value.trim())
        .map_err(|e| RuntimeError::InvalidConfig(format!("{}: {} ('{}')", name, e, value)))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}
