use anyhow::{anyhow, Result};
use courtmap_shared::ScreenSize;
use std::path::PathBuf;

// iPhone 14 logical resolution.
pub const DEFAULT_SCREEN_WIDTH: f64 = 390.0;
pub const DEFAULT_SCREEN_HEIGHT: f64 = 844.0;

pub const DEFAULT_COURTS_PATH: &str = "assets/courts.json";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings read from the environment once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub courts_path: PathBuf,
    pub screen: ScreenSize,
    pub log_filter: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let courts_path = PathBuf::from(
            lookup("COURTMAP_COURTS").unwrap_or_else(|| DEFAULT_COURTS_PATH.to_string()),
        );
        let width = dimension(&lookup, "COURTMAP_SCREEN_WIDTH", DEFAULT_SCREEN_WIDTH)?;
        let height = dimension(&lookup, "COURTMAP_SCREEN_HEIGHT", DEFAULT_SCREEN_HEIGHT)?;
        let log_filter = lookup("COURTMAP_LOG")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Settings {
            courts_path,
            screen: ScreenSize::new(width, height),
            log_filter,
        })
    }
}

fn dimension<F>(lookup: &F, key: &str, default: f64) -> Result<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    parse_pixels(&raw).map_err(|err| anyhow!("{}: {}", key, err))
}

/// Parse a screen dimension. Shared by env settings and command-line flags.
pub fn parse_pixels(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("must be a number, got {:?}", raw))?;
    if !(value.is_finite() && value > 0.0) {
        return Err(format!("must be a positive pixel count, got {}", value));
    }
    Ok(value)
}

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
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings.courts_path, PathBuf::from(DEFAULT_COURTS_PATH));
        assert!((settings.screen.width - DEFAULT_SCREEN_WIDTH).abs() < 1e-9);
        assert!((settings.screen.height - DEFAULT_SCREEN_HEIGHT).abs() < 1e-9);
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("COURTMAP_COURTS", "/tmp/courts.json"),
            ("COURTMAP_SCREEN_WIDTH", "1000"),
            ("COURTMAP_SCREEN_HEIGHT", " 800.5 "),
            ("RUST_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(settings.courts_path, PathBuf::from("/tmp/courts.json"));
        assert!((settings.screen.width - 1000.0).abs() < 1e-9);
        assert!((settings.screen.height - 800.5).abs() < 1e-9);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn test_courtmap_log_wins_over_rust_log() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("COURTMAP_LOG", "courtmap_shared=debug"),
            ("RUST_LOG", "warn"),
        ]))
        .unwrap();
        assert_eq!(settings.log_filter, "courtmap_shared=debug");
    }

    #[test]
    fn test_rejects_bad_dimensions() {
        let err = Settings::from_lookup(lookup_from(&[("COURTMAP_SCREEN_WIDTH", "wide")]))
            .unwrap_err();
        assert!(err.to_string().contains("COURTMAP_SCREEN_WIDTH"));

        assert!(Settings::from_lookup(lookup_from(&[("COURTMAP_SCREEN_HEIGHT", "0")])).is_err());
        assert!(Settings::from_lookup(lookup_from(&[("COURTMAP_SCREEN_HEIGHT", "-5")])).is_err());
    }

    #[test]
    fn test_parse_pixels() {
        assert!((parse_pixels(" 390 ").unwrap() - 390.0).abs() < 1e-9);
        assert!(parse_pixels("0").is_err());
        assert!(parse_pixels("-1").is_err());
        assert!(parse_pixels("inf").is_err());
        assert!(parse_pixels("NaN").is_err());
        assert!(parse_pixels("tall").is_err());
    }
}
