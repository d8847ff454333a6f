use crate::cli::args::{Args, Command, ConfigCommand, ConnectArgs, OutputFormat};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::communication::message::{DisplayOptions, SessionEvent};
use crate::core::session::Session;
use crate::domain::config::SerialTermConfig;
use crate::domain::error::SerialTermResult;
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::{list_ports, PortDescriptor};
use std::io::{self, BufRead};
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Execute CLI command
pub async fn execute_command(args: Args) -> SerialTermResult<()> {
    let config_manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let config = config_manager.load_config()?;

    if !args.quiet {
        init_logging(&config.general.log_level, args.verbose)?;
    }

    match args.command {
        Command::List { output } => execute_list(&ConsoleWriter::new(output)),
        Command::Connect(connect_args) => {
            let writer = ConsoleWriter::new(OutputFormat::Text);
            execute_connect(connect_args, &config, &writer).await
        }
        Command::Config(config_args) => {
            execute_config_command(config_args.command, &config, &config_manager)
        }
    }
}

fn execute_list(writer: &ConsoleWriter) -> SerialTermResult<()> {
    let ports = list_ports()?;
    writer.write_ports(&ports)?;
    Ok(())
}

async fn execute_connect(
    args: ConnectArgs,
    config: &SerialTermConfig,
    writer: &ConsoleWriter,
) -> SerialTermResult<()> {
    let port_id = PortDescriptor::parse_display(&args.port).to_string();
    let display = DisplayOptions::new(
        args.timestamps || config.display.timestamps,
        args.show_sent || config.display.show_sent,
    );

    let mut session = Session::open(config.session_config(port_id));
    let mut events = session.subscribe();
    session.start()?;

    writer.write_status(&format!(
        "Connected to {} at {} baud (Ctrl-D or Ctrl-C to quit)",
        session.config().port_id,
        session.config().baud_rate
    ))?;

    let mut input = spawn_stdin_reader()?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = input.recv() => match line.transpose()? {
                Some(line) => {
                    if let Err(e) = session.send(&args.eol.frame(&line)) {
                        writer.write_error(&e.to_string())?;
                    }
                }
                None => break,
            },
            Some(event) = events.recv() => render_event(writer, &display, &event)?,
            _ = &mut ctrl_c => break,
        }
    }

    tokio::task::block_in_place(|| session.stop());

    while let Ok(event) = events.try_recv() {
        render_event(writer, &display, &event)?;
    }

    let stats = session.statistics();
    info!(
        "Session summary: {} bytes sent in {} messages, {} bytes received in {} lines",
        stats.bytes_sent, stats.messages_sent, stats.bytes_received, stats.lines_received
    );
    Ok(())
}

/// Read stdin lines on a plain thread so a pending read never holds up shutdown
fn spawn_stdin_reader() -> SerialTermResult<mpsc::UnboundedReceiver<io::Result<String>>> {
    let (sender, receiver) = mpsc::unbounded_channel();

    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if sender.send(line).is_err() || failed {
                    break;
                }
            }
            debug!("Stopped reading stdin");
        })?;

    Ok(receiver)
}

fn render_event(
    writer: &ConsoleWriter,
    display: &DisplayOptions,
    event: &SessionEvent,
) -> SerialTermResult<()> {
    if let Some(line) = display.render(event) {
        writer.write_line(&line)?;
    }
    Ok(())
}

fn execute_config_command(
    command: ConfigCommand,
    config: &SerialTermConfig,
    config_manager: &ConfigManager,
) -> SerialTermResult<()> {
    match command {
        ConfigCommand::Show { output } => {
            ConsoleWriter::new(output).write_config(config)?;
            Ok(())
        }
        ConfigCommand::Init { output, force } => {
            let path = config_manager.init_config(output.as_deref(), force)?;
            ConsoleWriter::new(OutputFormat::Text)
                .write_status(&format!("Configuration written to {}", path.display()))?;
            Ok(())
        }
        ConfigCommand::Path => {
            ConsoleWriter::new(OutputFormat::Text)
                .write_line(&config_manager.config_path().display().to_string())?;
            Ok(())
        }
    }
}
