use crate::domain::Decimal;
use crate::engine::DEFAULT_INTEREST_RATE;
use std::collections::HashMap;
use thiserror::Error;

/// Event store file used when `DATABASE_PATH` is unset.
pub const DEFAULT_DATABASE_PATH: &str = "db.sqlite3";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    /// Simple interest charged per day on outstanding principal.
    pub interest_rate: Decimal,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let interest_rate = match env_map.get("INTEREST_RATE") {
            Some(raw) => parse_interest_rate(raw)
                .map_err(|msg| ConfigError::InvalidValue("INTEREST_RATE".to_string(), msg))?,
            None => DEFAULT_INTEREST_RATE,
        };

        Ok(Config {
            port,
            database_path,
            interest_rate,
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        database_path: Option<String>,
        interest_rate: Option<Decimal>,
    ) -> Self {
        if let Some(path) = database_path {
            self.database_path = path;
        }
        if let Some(rate) = interest_rate {
            self.interest_rate = rate;
        }
        self
    }
}

/// Parse a daily rate: an exact decimal between 0 and 1 inclusive.
pub fn parse_interest_rate(raw: &str) -> Result<Decimal, String> {
    let rate = Decimal::from_str_canonical(raw)
        .map_err(|_| format!("must be a decimal number, got {}", raw))?;
    if rate.is_negative() {
        return Err(format!("must not be negative, got {}", raw));
    }
    if rate > Decimal::from(1) {
        return Err(format!("must not exceed 1 per day, got {}", raw));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert_eq!(config.interest_rate, DEFAULT_INTEREST_RATE);
    }

    #[test]
    fn test_reads_all_values() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "9000".to_string());
        env_map.insert("DATABASE_PATH".to_string(), "/tmp/ledger.db".to_string());
        env_map.insert("INTEREST_RATE".to_string(), "0.001".to_string());

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, "/tmp/ledger.db");
        assert_eq!(config.interest_rate.to_canonical_string(), "0.001");
    }

    #[test]
    fn test_blank_database_path_uses_default() {
        let mut env_map = HashMap::new();
        env_map.insert("DATABASE_PATH".to_string(), "  ".to_string());
        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = HashMap::new();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_interest_rate() {
        let mut env_map = HashMap::new();
        env_map.insert("INTEREST_RATE".to_string(), "3.5%".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "INTEREST_RATE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_negative_interest_rate() {
        let mut env_map = HashMap::new();
        env_map.insert("INTEREST_RATE".to_string(), "-0.001".to_string());
        match Config::from_env_map(env_map) {
            Err(ConfigError::InvalidValue(k, msg)) => {
                assert_eq!(k, "INTEREST_RATE");
                assert!(msg.contains("negative"));
            }
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_interest_rate_above_one_rejected() {
        assert!(parse_interest_rate("1").is_ok());
        let msg = parse_interest_rate("1.5").unwrap_err();
        assert!(msg.contains("exceed"));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::from_env_map(HashMap::new())
            .unwrap()
            .with_overrides(Some("other.db".to_string()), Some(Decimal::zero()));
        assert_eq!(config.database_path, "other.db");
        assert!(config.interest_rate.is_zero());
    }
}
