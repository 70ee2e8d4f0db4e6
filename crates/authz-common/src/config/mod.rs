//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuthorityCacheConfig, ConfigError, DatabaseConfig, Environment,
    SnowflakeConfig,
};
