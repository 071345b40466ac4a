use std::env;

use tracing::info;

use crate::error::StrategistError;

/// Lightweight generation model used when `GEMINI_MODEL` is unset.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Generation service
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Option<String>,
    pub gemini_max_output_tokens: Option<u32>,

    // Trends service
    pub trends_hl: String,
    pub trends_tz: i32,
    pub trends_geo: String,
    pub trends_timeframe: String,

    // Scraping
    pub scrape_timeout_secs: u64,
    pub scrape_cache_capacity: usize,
    pub scrape_cache_ttl_secs: u64,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables, after merging a
    /// `.env` file if one exists. Exported variables take precedence.
    /// A missing `GEMINI_API_KEY` is a startup error.
    pub fn from_env() -> Result<Self, StrategistError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StrategistError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                StrategistError::Config(
                    "GEMINI_API_KEY environment variable is required".to_string(),
                )
            })?;

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL"),
            gemini_max_output_tokens: match lookup("GEMINI_MAX_OUTPUT_TOKENS") {
                Some(_) => Some(parsed(&lookup, "GEMINI_MAX_OUTPUT_TOKENS", 0)?),
                None => None,
            },
            trends_hl: lookup("TRENDS_HL").unwrap_or_else(|| "en-US".to_string()),
            trends_tz: parsed(&lookup, "TRENDS_TZ", 330)?,
            trends_geo: lookup("TRENDS_GEO").unwrap_or_else(|| "IN".to_string()),
            trends_timeframe: lookup("TRENDS_TIMEFRAME")
                .unwrap_or_else(|| "today 1-m".to_string()),
            scrape_timeout_secs: parsed(&lookup, "SCRAPE_TIMEOUT_SECS", 10)?,
            scrape_cache_capacity: parsed(&lookup, "SCRAPE_CACHE_CAPACITY", 64)?,
            scrape_cache_ttl_secs: parsed(&lookup, "SCRAPE_CACHE_TTL_SECS", 3600)?,
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port: parsed(&lookup, "WEB_PORT", 8501)?,
        })
    }

    /// Log the effective configuration without the API key.
    pub fn log_redacted(&self) {
        info!(
            gemini_model = self.gemini_model.as_str(),
            gemini_base_url = self.gemini_base_url.as_deref().unwrap_or("default"),
            gemini_api_key = "[redacted]",
            gemini_max_output_tokens = self.gemini_max_output_tokens,
            trends_geo = self.trends_geo.as_str(),
            trends_hl = self.trends_hl.as_str(),
            trends_tz = self.trends_tz,
            trends_timeframe = self.trends_timeframe.as_str(),
            scrape_timeout_secs = self.scrape_timeout_secs,
            scrape_cache_capacity = self.scrape_cache_capacity,
            scrape_cache_ttl_secs = self.scrape_cache_ttl_secs,
            "Configuration loaded"
        );
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, StrategistError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| StrategistError::Config(format!("{key} must be a number, got {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::ErrorKind;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "  ")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert!(config.gemini_max_output_tokens.is_none());
        assert_eq!(config.trends_geo, "IN");
        assert_eq!(config.trends_tz, 330);
        assert_eq!(config.trends_timeframe, "today 1-m");
        assert_eq!(config.scrape_timeout_secs, 10);
        assert_eq!(config.scrape_cache_capacity, 64);
        assert_eq!(config.web_port, 8501);
        assert!(config.gemini_base_url.is_none());
    }

    #[test]
    fn overrides_and_bad_numbers() {
        let config = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("TRENDS_GEO", "US"),
            ("TRENDS_TZ", "-300"),
            ("WEB_PORT", "9000"),
            ("GEMINI_MAX_OUTPUT_TOKENS", "2048"),
        ]))
        .unwrap();
        assert_eq!(config.gemini_max_output_tokens, Some(2048));
        assert_eq!(config.trends_geo, "US");
        assert_eq!(config.trends_tz, -300);
        assert_eq!(config.web_port, 9000);

        let err = Config::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k"),
            ("WEB_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("WEB_PORT"));
    }
}
