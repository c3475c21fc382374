//! Process settings from environment variables, read once at startup.

use crate::error::ConfigError;
use crate::store::is_identifier;

pub const DEFAULT_DATABASE_NAME: &str = "tree_store";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// PostgreSQL connection string. Absent means the service runs without a store.
    pub database_url: Option<String>,
    /// PostgreSQL schema holding the collection tables.
    pub database_name: String,
    /// Whether `DATABASE_NAME` was given explicitly.
    pub database_name_set: bool,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub body_limit_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: None,
            database_name: DEFAULT_DATABASE_NAME.into(),
            database_name_set: false,
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl Settings {
    /// Load from the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Settings::default();

        let database_name = var("DATABASE_NAME");
        if let Some(name) = &database_name {
            if !is_identifier(name) {
                return Err(ConfigError::InvalidIdentifier {
                    name: "DATABASE_NAME",
                    value: name.clone(),
                });
            }
        }

        Ok(Settings {
            database_url: var("DATABASE_URL"),
            database_name_set: database_name.is_some(),
            database_name: database_name.unwrap_or(defaults.database_name),
            host: var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", var("PORT"), defaults.port)?,
            max_connections: parse_var("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), defaults.max_connections)?,
            body_limit_bytes: parse_var("BODY_LIMIT_BYTES", var("BODY_LIMIT_BYTES"), defaults.body_limit_bytes)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidVar { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn reads_values() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/trees"),
            ("DATABASE_NAME", "xmas"),
            ("PORT", "9090"),
            ("DB_MAX_CONNECTIONS", " 12 "),
        ]))
        .unwrap();
        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/trees"));
        assert_eq!(settings.database_name, "xmas");
        assert!(settings.database_name_set);
        assert_eq!(settings.port, 9090);
        assert_eq!(settings.max_connections, 12);
    }

    #[test]
    fn blank_url_means_unconfigured() {
        let settings = Settings::from_lookup(lookup(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(settings.database_url, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Settings::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidVar { name: "PORT", .. })
        ));
        assert!(matches!(
            Settings::from_lookup(lookup(&[("DATABASE_NAME", "Tree-Store")])),
            Err(ConfigError::InvalidIdentifier { .. })
        ));
    }
}
