use crate::core::Mode;
use crate::utils::error::{GenieError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DOCKER_BINARY: &str = "docker";
pub const DEFAULT_IMAGE: &str = "muefab/genie:latest";
pub const DEFAULT_MOUNT_POINT: &str = "/work";
pub const DEFAULT_GENIE_BINARY: &str = "genie";

/// Whole configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenieConfig {
    pub runner: RunnerSection,
    #[serde(flatten)]
    pub settings: RunnerSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSection {
    pub mode: Option<String>,
}

/// Backend settings handed to the runners.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSettings {
    pub docker: DockerSettings,
    pub native: NativeSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerSettings {
    /// Container CLI, `docker` unless a compatible one is configured.
    pub binary: String,
    pub image: String,
    /// Where the shared host directory appears inside the container.
    pub mount_point: String,
}

impl Default for DockerSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_DOCKER_BINARY.to_string(),
            image: DEFAULT_IMAGE.to_string(),
            mount_point: DEFAULT_MOUNT_POINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeSettings {
    pub binary: String,
}

impl Default for NativeSettings {
    fn default() -> Self {
        Self {
            binary: DEFAULT_GENIE_BINARY.to_string(),
        }
    }
}

impl GenieConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GenieError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GenieError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders with environment values; unknown
    /// variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GenieError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Mode from the file, or the default when unset.
    pub fn mode(&self) -> &str {
        self.runner
            .mode
            .as_deref()
            .unwrap_or_else(|| Mode::default().as_str())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(mode) = &self.runner.mode {
            mode.parse::<Mode>()?;
        }
        self.settings.validate()
    }
}

impl Validate for RunnerSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("docker.binary", &self.docker.binary)?;
        validate_non_empty_string("docker.image", &self.docker.image)?;
        validate_non_empty_string("native.binary", &self.native.binary)?;

        if !self.docker.mount_point.starts_with('/') {
            return Err(GenieError::ConfigValidationError {
                field: "docker.mount_point".to_string(),
                message: format!(
                    "Mount point must be an absolute container path, got '{}'",
                    self.docker.mount_point
                ),
            });
        }

        Ok(())
    }
}

impl Validate for GenieConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
