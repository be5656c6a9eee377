use std::env;

pub const DEFAULT_DATABASE_PATH: &str = "app.db";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("DB_URI must name a database file; in-memory databases are not shared across pooled connections")]
    InMemoryDatabase,
}

/// Runtime settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Path of the SQLite database file.
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DB_URI")
            .map(|uri| normalize_database_url(&uri))
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
        if is_in_memory(&database_url) {
            return Err(ConfigError::InMemoryDatabase);
        }
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let pool_size = parse_or("DB_POOL_SIZE", lookup("DB_POOL_SIZE"), DEFAULT_POOL_SIZE)?;
        if pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DB_POOL_SIZE",
                value: pool_size.to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            pool_size,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}

/// Accepts SQLAlchemy-style `sqlite:///relative.db` and `sqlite:////absolute.db`
/// URIs as well as bare paths.
pub fn normalize_database_url(uri: &str) -> String {
    let uri = uri.trim();
    uri.strip_prefix("sqlite:///")
        .or_else(|| uri.strip_prefix("sqlite://"))
        .or_else(|| uri.strip_prefix("sqlite:"))
        .unwrap_or(uri)
        .to_string()
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.is_empty()
        || database_url == ":memory:"
        || database_url.starts_with("file::memory:")
        || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.database_url, "app.db");
        assert_eq!(config.port, 5555);
        assert_eq!(config.pool_size, DEFAULT_POOL_SIZE);
        assert_eq!(config.listen_addr(), "0.0.0.0:5555");
    }

    #[test]
    fn test_database_uri_forms() {
        assert_eq!(normalize_database_url("sqlite:///app.db"), "app.db");
        assert_eq!(normalize_database_url("sqlite:////tmp/app.db"), "/tmp/app.db");
        assert_eq!(normalize_database_url("/var/lib/pizza.db"), "/var/lib/pizza.db");
        assert_eq!(normalize_database_url(":memory:"), ":memory:");

        let config = config_from(&[("DB_URI", "sqlite:///data/pizza.db")]).unwrap();
        assert_eq!(config.database_url, "data/pizza.db");
    }

    #[test]
    fn test_in_memory_database_is_rejected() {
        for uri in ["sqlite:///:memory:", ":memory:", "file::memory:?cache=shared", ""] {
            assert!(
                matches!(
                    config_from(&[("DB_URI", uri)]),
                    Err(ConfigError::InMemoryDatabase)
                ),
                "accepted {uri:?}"
            );
        }
    }

    #[test]
    fn test_invalid_port() {
        let result = config_from(&[("PORT", "not-a-port")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_zero_pool_size() {
        let result = config_from(&[("DB_POOL_SIZE", "0")]);
        assert!(result.is_err());
    }
}
