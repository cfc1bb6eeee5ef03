// Configuration management module
// Handles TOML configuration loading and validation

pub mod settings;

pub use settings::{Config, ConfigError, OllamaConfig, ServerConfig, StorageConfig};
