use std::fmt::Display;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::analysis::content_selector::SelectionParams;
use crate::analysis::experience::detectors::{DetectorTier, UnknownTier};
use crate::analysis::experience::ParseOptions;
use crate::analysis::pipeline::EngineConfig;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset ones fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub min_primary: usize,
    pub additional_count: usize,
    pub additional_bullet_cap: usize,
    /// Header detector order for the work-experience parser.
    pub header_tiers: Vec<DetectorTier>,
    pub max_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process environment in `from_env`).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = SelectionParams::default();
        let header_tiers = match lookup("HEADER_TIERS") {
            Some(raw) => parse_tiers(&raw).context("HEADER_TIERS must be a comma list of header tiers")?,
            None => DetectorTier::DEFAULT_ORDER.to_vec(),
        };
        if header_tiers.is_empty() {
            bail!("HEADER_TIERS must name at least one tier");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            min_primary: parse_or(&lookup, "MIN_PRIMARY", defaults.min_primary)?,
            additional_count: parse_or(&lookup, "ADDITIONAL_COUNT", defaults.additional_count)?,
            additional_bullet_cap: parse_or(&lookup, "ADDITIONAL_BULLET_CAP", defaults.additional_bullet_cap)?,
            header_tiers,
            max_batch_size: parse_or(&lookup, "MAX_BATCH_SIZE", 20)?,
        })
    }

    /// Engine tunables derived from this config.
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            parse: ParseOptions {
                tiers: self.header_tiers.clone(),
            },
            selection: SelectionParams {
                min_primary: self.min_primary,
                additional_count: self.additional_count,
                additional_bullet_cap: self.additional_bullet_cap,
            },
        }
    }
}

/// `"delimiter, period,no_period"` → ordered tiers. Blank items are skipped.
pub fn parse_tiers(raw: &str) -> std::result::Result<Vec<DetectorTier>, UnknownTier> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(DetectorTier::from_str)
        .collect()
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_batch_size, 20);
        assert_eq!(config.header_tiers, DetectorTier::DEFAULT_ORDER.to_vec());
        assert_eq!(config.engine(), EngineConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("MIN_PRIMARY", "3"),
            ("ADDITIONAL_COUNT", "0"),
            ("HEADER_TIERS", "column, delimiter"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        let engine = config.engine();
        assert_eq!(engine.selection.min_primary, 3);
        assert_eq!(engine.selection.additional_count, 0);
        assert_eq!(engine.parse.tiers, vec![DetectorTier::Column, DetectorTier::Delimiter]);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("HEADER_TIERS", "delimiter,fuzzy")]).is_err());
        assert!(config_from(&[("HEADER_TIERS", " , ")]).is_err());
    }

    #[test]
    fn test_parse_tiers() {
        assert_eq!(
            parse_tiers("period,no_period").unwrap(),
            vec![DetectorTier::PeriodAnchored, DetectorTier::NoPeriod]
        );
        assert_eq!(parse_tiers("bogus"), Err(UnknownTier("bogus".to_string())));
    }
}
