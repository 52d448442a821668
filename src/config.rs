use std::env;

use crate::import::{CategoryMatching, ImportSettings};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub profile: String,
    pub import_batch_size: usize,
    pub import_start_row: usize,
    pub category_matching: CategoryMatching,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key/value source; unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let profile = lookup("PROFILE").unwrap_or_else(|| "default".to_string());

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            if profile == "default" {
                "sqlite://library_catalog.db?mode=rwc".to_string()
            } else {
                format!("sqlite://library_catalog_{}.db?mode=rwc", profile)
            }
        });

        let defaults = ImportSettings::default();

        Self {
            database_url,
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            profile,
            import_batch_size: lookup("IMPORT_BATCH_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.batch_size),
            import_start_row: lookup("IMPORT_START_ROW")
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.start_row),
            category_matching: lookup("CATEGORY_MATCHING")
                .and_then(|s| CategoryMatching::parse(&s))
                .unwrap_or(defaults.category_matching),
        }
    }

    pub fn import_settings(&self) -> ImportSettings {
        ImportSettings {
            batch_size: self.import_batch_size,
            start_row: self.import_start_row,
            category_matching: self.category_matching,
            ..ImportSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.database_url, "sqlite://library_catalog.db?mode=rwc");
        assert_eq!(config.port, 8000);
        assert_eq!(config.import_batch_size, 50);
        assert_eq!(config.import_start_row, 8);
        assert_eq!(config.category_matching, CategoryMatching::Legacy);
    }

    #[test]
    fn test_profile_selects_database() {
        let config = config_from(&[("PROFILE", "branch2")]);
        assert_eq!(
            config.database_url,
            "sqlite://library_catalog_branch2.db?mode=rwc"
        );
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("IMPORT_BATCH_SIZE", "0"),
            ("IMPORT_START_ROW", "2"),
            ("CATEGORY_MATCHING", "leading-digit"),
        ]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.import_batch_size, 50);
        assert_eq!(config.import_start_row, 2);
        assert_eq!(config.category_matching, CategoryMatching::LeadingDigit);

        let settings = config.import_settings();
        assert_eq!(settings.start_row, 2);
        assert_eq!(settings.category_matching, CategoryMatching::LeadingDigit);
    }
}
