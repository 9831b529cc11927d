mod defaults;
mod types;

pub use defaults::DEFAULT_CONFIG_FILE;
pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_name: default_tool_name(),
            format: None,
            pattern: None,
            level_map: HashMap::new(),
            analysis_path: default_analysis_path(),
            github: GithubConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load an explicitly named file, or `lintbridge.yaml` if it exists,
    /// or fall back to defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.is_file() {
            debug!("Using {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve which parser the input needs
    pub fn input_source(&self) -> Result<InputSource<'_>, ConfigError> {
        match (self.format.as_deref(), self.pattern.as_deref()) {
            (Some(format), None) => Ok(InputSource::Format(format)),
            (None, Some(pattern)) => Ok(InputSource::Pattern(pattern)),
            (Some(format), Some(_)) => Err(ConfigError::FormatAndPattern(format.to_string())),
            (None, None) => Err(ConfigError::NoFormat),
        }
    }
}
