use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_FOLLOW_UP_DAYS: u32 = 30;
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_RATE_LIMIT_PER_SECOND: u64 = 10;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Staleness threshold used when `/follow-ups` is called without `days`.
    pub follow_up_days: u32,
    /// Ranking size used when `/top` is called without `n`.
    pub top_n: usize,
    pub max_body_bytes: usize,
    /// Requests replenished per second for each client IP. `0` disables
    /// rate limiting.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            follow_up_days: DEFAULT_FOLLOW_UP_DAYS,
            top_n: DEFAULT_TOP_N,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            rate_limit_per_second: DEFAULT_RATE_LIMIT_PER_SECOND,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Missing or blank keys
    /// fall back to the defaults; present keys must parse.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            port: match var("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))
                    .and_then(|port: u16| {
                        if port == 0 {
                            anyhow::bail!("PORT must be a valid number between 1-65535");
                        }
                        Ok(port)
                    })?,
                None => DEFAULT_PORT,
            },
            follow_up_days: match var("CRM_FOLLOW_UP_DAYS") {
                Some(days) => days.trim().parse().map_err(|_| {
                    anyhow::anyhow!("CRM_FOLLOW_UP_DAYS must be a non-negative number of days")
                })?,
                None => DEFAULT_FOLLOW_UP_DAYS,
            },
            top_n: match var("CRM_TOP_N") {
                Some(n) => n
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("CRM_TOP_N must be a non-negative integer"))?,
                None => DEFAULT_TOP_N,
            },
            max_body_bytes: match var("CRM_MAX_BODY_BYTES") {
                Some(bytes) => bytes.trim().parse().map_err(|_| {
                    anyhow::anyhow!("CRM_MAX_BODY_BYTES must be a positive number of bytes")
                })?,
                None => DEFAULT_MAX_BODY_BYTES,
            },
            rate_limit_per_second: match var("CRM_RATE_LIMIT_PER_SECOND") {
                Some(rate) => rate.trim().parse().map_err(|_| {
                    anyhow::anyhow!("CRM_RATE_LIMIT_PER_SECOND must be a non-negative integer")
                })?,
                None => DEFAULT_RATE_LIMIT_PER_SECOND,
            },
            rate_limit_burst: match var("CRM_RATE_LIMIT_BURST") {
                Some(burst) => burst
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("CRM_RATE_LIMIT_BURST must be a positive integer"))
                    .and_then(|burst: u32| {
                        if burst == 0 {
                            anyhow::bail!("CRM_RATE_LIMIT_BURST must be a positive integer");
                        }
                        Ok(burst)
                    })?,
                None => DEFAULT_RATE_LIMIT_BURST,
            },
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!(
            "Defaults: follow-up after {} days, top {} customers",
            config.follow_up_days,
            config.top_n
        );

        Ok(config)
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
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.follow_up_days, 30);
        assert_eq!(config.top_n, 5);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.rate_limit_per_second, 10);
        assert_eq!(config.rate_limit_burst, 20);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("CRM_FOLLOW_UP_DAYS", "14"),
            ("CRM_TOP_N", " 10 "),
            ("CRM_MAX_BODY_BYTES", ""),
            ("CRM_RATE_LIMIT_PER_SECOND", "0"),
        ]))
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.follow_up_days, 14);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.rate_limit_per_second, 0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_lookup(lookup(&[("PORT", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CRM_FOLLOW_UP_DAYS", "-1")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CRM_TOP_N", "five")])).is_err());
        assert!(Config::from_lookup(lookup(&[("CRM_RATE_LIMIT_BURST", "0")])).is_err());
    }
}
