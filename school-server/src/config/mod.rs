pub(crate) use crate::config::printer::PrinterConfig;
pub(crate) use crate::config::store::{StoreBackendKind, StoreConfig};
use config::{Config as ConfigCrate, ConfigError, Environment};
use serde::Deserialize;

pub mod printer;
pub mod store;

/// Main configuration structure for the school server
#[derive(Debug, Deserialize, Clone)]
pub struct SchoolConfig {
    /// The port the server will listen to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Student printing demonstration configuration
    #[serde(default)]
    pub printer: PrinterConfig,
}

fn default_port() -> u16 {
    8080
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            store: StoreConfig::default(),
            printer: PrinterConfig::default(),
        }
    }
}

impl SchoolConfig {
    /// Creates a new Config instance from environment variables
    ///
    /// Nested keys are separated with a double underscore, e.g.
    /// `SCHOOL_STORE__BACKEND=redis` or `SCHOOL_PRINTER__WORKERS=4`.
    pub fn new() -> Result<Self, String> {
        Self::from_environment(Self::environment())
    }

    /// The `SCHOOL_` environment source read by [`Self::new`]
    fn environment() -> Environment {
        Environment::with_prefix("SCHOOL")
            .prefix_separator("_")
            .separator("__")
    }

    fn from_environment(environment: Environment) -> Result<Self, String> {
        let config: Self = ConfigCrate::builder()
            .add_source(environment)
            .build()
            .map_err(|e: ConfigError| e.to_string())?
            .try_deserialize()
            .map_err(|e| e.to_string())?;

        config.printer.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn for_test() -> Self {
        Self {
            port: 0, // Let the OS choose a port
            store: StoreConfig {
                backend: StoreBackendKind::InMemory,
                ..Default::default()
            },
            printer: PrinterConfig::default(),
        }
    }
}
