use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments for SerialTerm
#[derive(Parser, Debug)]
#[command(
    name = "serialterm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Line-oriented serial port terminal",
    long_about = "A serial port terminal: list available ports, connect at 9600 baud, show incoming lines with optional timestamps and send typed text."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available serial ports
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Open a serial port and relay standard input to it
    Connect(ConnectArgs),
    /// Configuration management commands
    Config(ConfigArgs),
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

/// Serial connection arguments
#[derive(ClapArgs, Debug)]
pub struct ConnectArgs {
    /// Serial port path, or a line from `serialterm list`
    pub port: String,

    /// Prefix lines with their arrival time
    #[arg(short, long)]
    pub timestamps: bool,

    /// Echo sent data as `<` lines
    #[arg(short, long)]
    pub show_sent: bool,

    /// Terminator appended to each line read from standard input
    #[arg(short, long, value_enum, default_value = "none")]
    pub eol: LineEnding,
}

/// Configuration management arguments
#[derive(ClapArgs, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Write a default configuration file
    Init {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

/// Line terminator argument
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// Send input exactly as typed
    #[default]
    None,
    /// `\n`
    Lf,
    /// `\r`
    Cr,
    /// `\r\n`
    Crlf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::None => "",
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Frame one line of user input for the wire
    pub fn frame(&self, line: &str) -> String {
        format!("{}{}", line, self.as_str())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect() {
        let args = Args::try_parse_from([
            "serialterm",
            "connect",
            "/dev/ttyUSB0",
            "--timestamps",
            "--eol",
            "crlf",
        ])
        .unwrap();

        match args.command {
            Command::Connect(connect) => {
                assert_eq!(connect.port, "/dev/ttyUSB0");
                assert!(connect.timestamps);
                assert!(!connect.show_sent);
                assert_eq!(connect.eol, LineEnding::Crlf);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_with_global_flags() {
        let args =
            Args::try_parse_from(["serialterm", "list", "-o", "json", "--verbose"]).unwrap();

        assert!(args.verbose);
        assert!(matches!(
            args.command,
            Command::List {
                output: OutputFormat::Json
            }
        ));
    }

    #[test]
    fn test_connect_requires_port() {
        assert!(Args::try_parse_from(["serialterm", "connect"]).is_err());
    }

    #[test]
    fn test_line_ending_framing() {
        assert_eq!(LineEnding::None.frame("AT"), "AT");
        assert_eq!(LineEnding::Lf.frame("AT"), "AT\n");
        assert_eq!(LineEnding::Crlf.frame("AT"), "AT\r\n");
    }
}
