use crate::domain::config::SerialTermConfig;
use crate::domain::error::{SerialTermError, SerialTermResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user configuration file
    pub fn new() -> SerialTermResult<Self> {
        Ok(Self {
            config_path: Self::default_config_path()?,
        })
    }

    /// Manager for an explicit configuration file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration; a missing file yields the defaults
    pub fn load_config(&self) -> SerialTermResult<SerialTermConfig> {
        if !self.config_path.exists() {
            debug!("No config at {}, using defaults", self.config_path.display());
            return Ok(SerialTermConfig::default());
        }

        self.load_config_from_path(&self.config_path)
    }

    /// Load and validate configuration from a specific path
    pub fn load_config_from_path(&self, path: &Path) -> SerialTermResult<SerialTermConfig> {
        let content = fs::read_to_string(path).map_err(|e| SerialTermError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: SerialTermConfig =
            toml::from_str(&content).map_err(|e| SerialTermError::Config {
                message: format!("Failed to parse config file {}: {}", path.display(), e),
            })?;

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save_config_to_path(
        &self,
        path: &Path,
        config: &SerialTermConfig,
    ) -> SerialTermResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SerialTermError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| SerialTermError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| SerialTermError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Write a default configuration file to `path` (or the managed path)
    pub fn init_config(&self, path: Option<&Path>, force: bool) -> SerialTermResult<PathBuf> {
        let target = path.unwrap_or(self.config_path.as_path());

        if target.exists() && !force {
            return Err(SerialTermError::Config {
                message: format!("Configuration already exists at {}", target.display()),
            });
        }

        self.save_config_to_path(target, &SerialTermConfig::default())?;
        Ok(target.to_path_buf())
    }

    fn default_config_path() -> SerialTermResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| SerialTermError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("serialterm").join("config.toml"))
    }
}
