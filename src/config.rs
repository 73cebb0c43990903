use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub recipe: RecipeConfig,
    #[serde(default)]
    pub shopping: ShoppingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecipeConfig {
    #[serde(default = "default_max_value")]
    pub max_amount: i64,
    #[serde(default = "default_max_value")]
    pub max_cooking_time: i64,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            max_amount: default_max_value(),
            max_cooking_time: default_max_value(),
        }
    }
}

/// Keeps shopping list sums far from `i64` overflow.
const MAX_AMOUNT_LIMIT: i64 = i32::MAX as i64;

fn default_max_value() -> i64 {
    32767
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShoppingConfig {
    /// File name offered by the shopping list download.
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl Default for ShoppingConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
        }
    }
}

fn default_filename() -> String {
    "shoplist.txt".to_string()
}

impl RecipeConfig {
    pub fn limits(&self) -> recipebox_recipe::Limits {
        recipebox_recipe::Limits {
            max_amount: self.max_amount,
            max_cooking_time: self.max_cooking_time,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (RECIPEBOX__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite:recipebox.db")?
            .set_default("database.max_connections", 5)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when missing
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("RECIPEBOX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if !(1..=MAX_AMOUNT_LIMIT).contains(&self.recipe.max_amount) {
            return Err(format!(
                "Recipe max_amount must be between 1 and {MAX_AMOUNT_LIMIT}"
            ));
        }
        if self.recipe.max_cooking_time < 1 {
            return Err("Recipe max_cooking_time must be at least 1".to_string());
        }
        if self.shopping.filename.trim().is_empty() {
            return Err("Shopping list filename must not be empty".to_string());
        }
        if self
            .shopping
            .filename
            .chars()
            .any(|c| c == '"' || c == '\\' || c == '/' || c.is_control())
        {
            return Err(
                "Shopping list filename must not contain quotes, slashes or control characters"
                    .to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            observability: ObservabilityConfig::default(),
            recipe: RecipeConfig::default(),
            shopping: ShoppingConfig::default(),
        }
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_max_amount() {
        let mut config = config();
        config.recipe.max_amount = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_max_amount_upper_bound() {
        let mut config = config();
        config.recipe.max_amount = i64::MAX;

        assert!(config.validate().is_err());

        config.recipe.max_amount = i32::MAX as i64;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_filename() {
        let mut config = config();
        config.shopping.filename = " ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_filename_header_safe() {
        let mut config = config();

        for name in ["shop\"list.txt", "shop\nlist.txt", "../shoplist.txt", "a\\b.txt"] {
            config.shopping.filename = name.to_string();
            assert!(config.validate().is_err(), "{name:?} accepted");
        }

        config.shopping.filename = "courses-semaine.txt".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = config();

        assert!(config.validate().is_ok());
        assert_eq!(config.recipe.limits().max_amount, 32767);
        assert_eq!(config.shopping.filename, "shoplist.txt");
    }
}
