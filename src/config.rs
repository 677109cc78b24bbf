use crate::pricing::TaxRate;
use anyhow::{Context, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    pub tax_rate: TaxRate,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            tax_rate: TaxRate::default(),
            http_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load from the environment, reading `.env` first if one exists
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            api_url: try_load(&lookup, "SHORTLET_API_URL", defaults.api_url)?,
            api_token: lookup("SHORTLET_API_TOKEN").filter(|t| !t.trim().is_empty()),
            tax_rate: TaxRate::from_basis_points(try_load(
                &lookup,
                "SHORTLET_TAX_RATE_BPS",
                defaults.tax_rate.basis_points(),
            )?),
            http_timeout_secs: try_load(&lookup, "SHORTLET_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
        })
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("Invalid {key} value: {raw}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tax_rate, TaxRate::from_percent(2));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SHORTLET_API_URL", "https://api.example.com"),
            ("SHORTLET_API_TOKEN", "secret"),
            ("SHORTLET_TAX_RATE_BPS", "2000"),
            ("SHORTLET_HTTP_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.tax_rate, TaxRate::from_percent(20));
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[("SHORTLET_TAX_RATE_BPS", "twenty")])).unwrap_err();
        assert!(err.to_string().contains("SHORTLET_TAX_RATE_BPS"));
    }

    #[test]
    fn blank_token_means_anonymous() {
        let config = Config::from_lookup(lookup(&[("SHORTLET_API_TOKEN", "  ")])).unwrap();
        assert!(config.api_token.is_none());
    }
}
