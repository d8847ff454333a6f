use crate::core::communication::{
    lines::LineBuffer,
    message::{InboundEvent, SessionEvent},
    transport::LinkReader,
};
use crate::core::session::{session::EventSink, state::Counters};
use std::io::{ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, trace};

/// Pause after a zero-length read so an idle link does not spin
pub(crate) const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

const READ_BUFFER_SIZE: usize = 1024;

/// Everything the receive thread owns
pub(crate) struct ReceiveLoop {
    pub(crate) port_id: String,
    pub(crate) reader: LinkReader,
    pub(crate) running: Arc<AtomicBool>,
    pub(crate) sink: EventSink,
    pub(crate) counters: Arc<Counters>,
}

impl ReceiveLoop {
    /// Read until the running flag is cleared or the link fails.
    ///
    /// The flag is checked before every read, and every read is bounded by the
    /// link's read timeout, so a stop is observed within one timeout interval.
    pub(crate) fn run(mut self) {
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        let mut lines = LineBuffer::new();

        debug!("Receive loop for '{}' started", self.port_id);

        while self.running.load(Ordering::Acquire) {
            match self.reader.read(&mut buffer) {
                Ok(0) => {
                    thread::sleep(IDLE_POLL_INTERVAL);
                }
                Ok(n) => {
                    trace!("Received {} bytes from '{}'", n, self.port_id);
                    self.counters.record_read(n);

                    for line in lines.push(&buffer[..n]) {
                        self.counters.record_line();
                        self.sink.emit(SessionEvent::Received(InboundEvent::now(line)));
                    }
                }
                Err(ref e)
                    if matches!(
                        e.kind(),
                        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    error!("Failed to read from '{}': {}", self.port_id, e);
                    self.sink.emit(SessionEvent::ReadFailed {
                        reason: e.to_string(),
                    });
                    break;
                }
            }
        }

        if lines.pending_len() > 0 {
            debug!(
                "Discarding {} unterminated bytes from '{}'",
                lines.pending_len(),
                self.port_id
            );
        }
        debug!("Receive loop for '{}' exited", self.port_id);
    }
}
