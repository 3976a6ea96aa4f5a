use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::persistence::Locality;

/// Main configuration structure for artifact-lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Editing session settings
    pub session: SessionConfig,
    /// Defaults applied when publishing
    pub publish: PublishConfig,
    /// Action execution settings
    pub execution: ExecutionConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Whether objects are edited in a locally hosted session
    pub served_locally: bool,
}

impl SessionConfig {
    pub fn locality(&self) -> Locality {
        Locality::from_served_locally(self.served_locally)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            served_locally: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Project used when the caller does not name one
    pub default_project: String,
    /// Entity used when the caller does not name one
    pub default_entity: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            default_project: "weave".to_string(),
            default_entity: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Reject a second action while one is still in flight
    pub single_flight: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            single_flight: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl LifecycleConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (artifact-lifecycle.toml)
    /// 3. Environment variables (prefixed with ARTIFACT_LIFECYCLE_)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("artifact-lifecycle.toml"))
    }

    /// Same as [`LifecycleConfig::load`] with an explicit file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut builder = Config::builder();

        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // ARTIFACT_LIFECYCLE_SESSION__SERVED_LOCALLY=false
        builder = builder.add_source(
            Environment::with_prefix("ARTIFACT_LIFECYCLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}
