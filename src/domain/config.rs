use crate::domain::error::{SerialTermError, SerialTermResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Baud rate every session is opened with
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// SerialTerm configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerialTermConfig {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Serial connection settings
    #[serde(default)]
    pub serial: SerialSettings,
    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,
}

/// General configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Serial connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Read timeout in milliseconds; also bounds how long a stop can take
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
}

/// Display preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Prefix lines with the local arrival time
    #[serde(default)]
    pub timestamps: bool,
    /// Echo sent data
    #[serde(default)]
    pub show_sent: bool,
}

/// Parameters a session is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// OS device path or name
    pub port_id: String,
    pub baud_rate: u32,
    pub read_timeout: Duration,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_read_timeout() -> u64 {
    1000
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            read_timeout_ms: default_read_timeout(),
        }
    }
}

impl SerialTermConfig {
    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> SerialTermResult<()> {
        if self.serial.read_timeout_ms == 0 {
            return Err(SerialTermError::Config {
                message: "serial.read_timeout_ms must be greater than zero".to_string(),
            });
        }

        if self.general.log_level.trim().is_empty() {
            return Err(SerialTermError::Config {
                message: "general.log_level must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Build the session parameters for a port using these settings
    pub fn session_config(&self, port_id: impl Into<String>) -> SessionConfig {
        SessionConfig {
            port_id: port_id.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(self.serial.read_timeout_ms),
        }
    }
}

impl SessionConfig {
    pub fn new(port_id: impl Into<String>) -> Self {
        Self {
            port_id: port_id.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_millis(default_read_timeout()),
        }
    }

    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}
