/// 환경 변수 기반 설정
// region:    --- Imports
use crate::bidding::eligibility::EligibilityPolicy;
use std::env;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MAX_BID_RETRIES: u32 = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 없으면 인메모리 저장소로 동작
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub max_connections: u32,
    pub reset_database: bool,
    pub max_bid_retries: u32,
    pub eligibility: EligibilityPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            reset_database: false,
            max_bid_retries: DEFAULT_MAX_BID_RETRIES,
            eligibility: EligibilityPolicy::default(),
        }
    }
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드 (테스트용)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let min_rating_percent = parse_or(
            &lookup,
            "MIN_RATING_PERCENT",
            defaults.eligibility.min_rating_percent,
        )?;
        if !(0.0..=1.0).contains(&min_rating_percent) {
            return Err(ConfigError::Invalid {
                key: "MIN_RATING_PERCENT",
                value: min_rating_percent.to_string(),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            reset_database: parse_or(&lookup, "RESET_DATABASE", defaults.reset_database)?,
            max_bid_retries: parse_or(&lookup, "MAX_BID_RETRIES", defaults.max_bid_retries)?,
            eligibility: EligibilityPolicy {
                min_rating_percent,
                min_rating_reviews: parse_or(
                    &lookup,
                    "MIN_RATING_REVIEWS",
                    defaults.eligibility.min_rating_reviews,
                )?,
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.eligibility.min_rating_percent, 0.8);
        assert_eq!(config.eligibility.min_rating_reviews, 0);
        assert_eq!(config.max_bid_retries, DEFAULT_MAX_BID_RETRIES);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/auction"),
            ("MIN_RATING_PERCENT", "0.5"),
            ("MIN_RATING_REVIEWS", "3"),
            ("RESET_DATABASE", "true"),
        ]))
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/auction")
        );
        assert_eq!(config.eligibility.min_rating_percent, 0.5);
        assert_eq!(config.eligibility.min_rating_reviews, 3);
        assert!(config.reset_database);
    }

    #[test]
    fn rejects_out_of_range_rating_percent() {
        let err = AppConfig::from_lookup(lookup_from(&[("MIN_RATING_PERCENT", "1.5")]));
        assert!(matches!(
            err,
            Err(ConfigError::Invalid {
                key: "MIN_RATING_PERCENT",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[("MAX_BID_RETRIES", "many")]));
        assert!(err.is_err());
    }
}
