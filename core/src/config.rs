use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, Result};

/// Environment variable holding the YAML config when no file path is given.
pub const CONFIG_ENV_VAR: &str = "GREETER_CONFIG";

const SUPPORTED_VERSION: u32 = 1;

/// Settings for the runners. The greeter itself takes no configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GreeterConfig {
    pub version: u32,
    pub telemetry: TelemetryConfig,
    pub container: ContainerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// A `tracing_subscriber::EnvFilter` directive. `RUST_LOG` wins when set.
    pub log_filter: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub on_invalid_event: InvalidEventPolicy,
}

/// What the container runner does with a line it cannot turn into an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidEventPolicy {
    /// Answer with an error line and move on to the next event.
    #[default]
    Skip,
    /// Stop the runner.
    Fail,
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            telemetry: TelemetryConfig::default(),
            container: ContainerConfig::default(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
        }
    }
}

/// Loads from `config_path` if given, else from `GREETER_CONFIG`, else defaults.
pub fn load_config(config_path: Option<&str>) -> Result<GreeterConfig> {
    let config = match config_path {
        Some(path) => GreeterConfig::from_file(path)?,
        None => GreeterConfig::from_env()?.unwrap_or_default(),
    };
    config.validate()?;
    Ok(config)
}

impl GreeterConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            origin: path.to_string(),
            error: Box::new(e),
        })?;
        Self::from_yaml(path, &content)
    }

    /// Returns `None` when the environment variable is not set.
    pub fn from_env() -> Result<Option<Self>> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(content) => Self::from_yaml(CONFIG_ENV_VAR, &content).map(Some),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(e) => Err(ConfigError::LoadFailed {
                origin: CONFIG_ENV_VAR.to_string(),
                error: Box::new(e),
            }
            .into()),
        }
    }

    pub fn from_yaml(origin: &str, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GreeterConfig =
            serde_yaml::from_str(content).map_err(|e| ConfigError::LoadFailed {
                origin: origin.to_string(),
                error: Box::new(e),
            })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_VERSION {
            return Err(ConfigError::ValidationFailed {
                reason: format!(
                    "unsupported config version {}, expected {}",
                    self.version, SUPPORTED_VERSION
                ),
            }
            .into());
        }
        if self.telemetry.log_filter.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "telemetry.log_filter cannot be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GreeterError;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
version: 1
telemetry:
  log_filter: "greeter_core=debug,runner_container=trace"
container:
  on_invalid_event: fail
"#;
        let config = GreeterConfig::from_yaml("inline", yaml).unwrap();

        assert_eq!(config.version, 1);
        assert_eq!(
            config.telemetry.log_filter,
            "greeter_core=debug,runner_container=trace"
        );
        assert_eq!(config.container.on_invalid_event, InvalidEventPolicy::Fail);
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = GreeterConfig::from_yaml("inline", "version: 1\n").unwrap();
        assert_eq!(config, GreeterConfig::default());
        assert_eq!(config.container.on_invalid_event, InvalidEventPolicy::Skip);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = GreeterConfig::from_yaml("inline", "  \n").unwrap();
        assert_eq!(config, GreeterConfig::default());
    }

    #[test]
    fn test_unknown_policy_fails_to_load() {
        let yaml = "container:\n  on_invalid_event: retry\n";
        let err = GreeterConfig::from_yaml("inline", yaml).unwrap_err();
        assert!(matches!(
            err,
            GreeterError::Config(ConfigError::LoadFailed { ref origin, .. }) if origin == "inline"
        ));
    }

    #[test]
    fn test_validate_rejects_other_versions() {
        let config = GreeterConfig {
            version: 2,
            ..GreeterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GreeterError::Config(ConfigError::ValidationFailed { .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_blank_filter() {
        let mut config = GreeterConfig::default();
        config.telemetry.log_filter = " ".to_string();
        assert!(matches!(
            config.validate(),
            Err(GreeterError::Config(ConfigError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = GreeterConfig::from_file("/nonexistent/greeter.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/greeter.yaml"));
    }
}
