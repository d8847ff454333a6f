use crate::domain::config::SessionConfig;
use std::io::{Read, Write};

/// Receive half of an open connection
pub type LinkReader = Box<dyn Read + Send>;

/// Transmit half of an open connection
pub type LinkWriter = Box<dyn Write + Send>;

/// An open connection split into halves that can be driven from different threads.
///
/// Reads on `reader` must return `ErrorKind::TimedOut` (or `WouldBlock`) once the
/// configured read timeout elapses without data, so the receive loop can observe
/// a stop request.
pub struct Link {
    pub reader: LinkReader,
    pub writer: LinkWriter,
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Link").finish_non_exhaustive()
    }
}

/// Opens connections for sessions
pub trait Connector: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Open the device named by `config.port_id` at `config.baud_rate`
    fn connect(&self, config: &SessionConfig) -> serialport::Result<Link>;
}
