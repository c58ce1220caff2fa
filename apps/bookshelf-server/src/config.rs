//! Layered application configuration.
//!
//! Precedence: built-in defaults, then the YAML file (when given), then
//! `BOOKSHELF__*` environment variables, then CLI overrides.

use std::path::Path;

use bookshelf_catalog::CatalogConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Tracing filter directive, e.g. `info` or `bookshelf_catalog=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration with the documented layering.
    ///
    /// # Errors
    /// Returns a figment error for unreadable files or type mismatches.
    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("BOOKSHELF__").split("__"))
            .extract()
    }

    /// Apply CLI flags on top of the loaded configuration.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.server.port = port;
        }
        match verbose {
            0 => {}
            1 => self.logging.level = "info".to_owned(),
            2 => self.logging.level = "debug".to_owned(),
            _ => self.logging.level = "trace".to_owned(),
        }
    }
}
