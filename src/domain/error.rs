use thiserror::Error;

/// SerialTerm unified error type
#[derive(Error, Debug)]
pub enum SerialTermError {
    #[error("Failed to enumerate serial ports: {0}")]
    Enumeration(#[source] serialport::Error),

    #[error("Failed to open serial port '{port}': {source}")]
    Connect {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Failed to write to serial port: {0}")]
    Send(#[source] std::io::Error),

    #[error("Serial port not connected")]
    NotConnected,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

pub type SerialTermResult<T> = Result<T, SerialTermError>;
