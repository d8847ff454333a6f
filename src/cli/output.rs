use crate::cli::args::OutputFormat;
use crate::domain::config::SerialTermConfig;
use crate::infrastructure::serial::PortDescriptor;
use std::io::{self, Write};
use tabled::{Table, Tabled};

/// Output writer trait for different formats
pub trait OutputWriter {
    fn write_ports(&self, ports: &[PortDescriptor]) -> Result<(), OutputError>;
    fn write_config(&self, config: &SerialTermConfig) -> Result<(), OutputError>;
    /// One transcript line on stdout
    fn write_line(&self, line: &str) -> Result<(), OutputError>;
    /// Status text on stderr, kept out of the transcript
    fn write_status(&self, message: &str) -> Result<(), OutputError>;
    fn write_error(&self, error: &str) -> Result<(), OutputError>;
}

/// Output formatting errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("TOML serialization error: {0}")]
    TomlError(#[from] toml::ser::Error),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl From<OutputError> for crate::domain::error::SerialTermError {
    fn from(err: OutputError) -> Self {
        Self::Output(err.to_string())
    }
}

/// Console output writer
pub struct ConsoleWriter {
    format: OutputFormat,
}

impl ConsoleWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl OutputWriter for ConsoleWriter {
    fn write_ports(&self, ports: &[PortDescriptor]) -> Result<(), OutputError> {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Text => {
                if ports.is_empty() {
                    writeln!(stdout, "No serial ports found")?;
                }
                for port in ports {
                    writeln!(stdout, "{}", port)?;
                }
            }
            OutputFormat::Json => {
                writeln!(stdout, "{}", serde_json::to_string_pretty(ports)?)?;
            }
            OutputFormat::Table => {
                if !ports.is_empty() {
                    writeln!(stdout, "{}", Table::new(ports))?;
                }
            }
        }
        Ok(())
    }

    fn write_config(&self, config: &SerialTermConfig) -> Result<(), OutputError> {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Text => {
                write!(stdout, "{}", toml::to_string_pretty(config)?)?;
            }
            OutputFormat::Json => {
                writeln!(stdout, "{}", serde_json::to_string_pretty(config)?)?;
            }
            OutputFormat::Table => {
                writeln!(stdout, "{}", Table::new(ConfigRow::from_config(config)))?;
            }
        }
        Ok(())
    }

    fn write_line(&self, line: &str) -> Result<(), OutputError> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }

    fn write_status(&self, message: &str) -> Result<(), OutputError> {
        writeln!(io::stderr(), "{}", message)?;
        Ok(())
    }

    fn write_error(&self, error: &str) -> Result<(), OutputError> {
        writeln!(io::stderr(), "Error: {}", error)?;
        Ok(())
    }
}

/// Table row for configuration display
#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

impl ConfigRow {
    fn from_config(config: &SerialTermConfig) -> Vec<Self> {
        vec![
            ConfigRow {
                key: "general.log_level",
                value: config.general.log_level.clone(),
            },
            ConfigRow {
                key: "serial.read_timeout_ms",
                value: config.serial.read_timeout_ms.to_string(),
            },
            ConfigRow {
                key: "display.timestamps",
                value: config.display.timestamps.to_string(),
            },
            ConfigRow {
                key: "display.show_sent",
                value: config.display.show_sent.to_string(),
            },
        ]
    }
}
