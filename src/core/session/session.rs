use crate::core::communication::{
    message::{OutboundEvent, SessionEvent},
    transport::{Connector, LinkWriter},
};
use crate::core::session::{
    receiver::ReceiveLoop,
    state::{Counters, SessionState, SessionStatistics},
};
use crate::domain::{
    config::SessionConfig,
    error::{SerialTermError, SerialTermResult},
};
use crate::infrastructure::serial::SerialPortConnector;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Shared slot for the subscriber's channel, readable from the receive thread
#[derive(Clone, Default)]
pub(crate) struct EventSink {
    sender: Arc<RwLock<Option<mpsc::UnboundedSender<SessionEvent>>>>,
}

impl EventSink {
    pub(crate) fn emit(&self, event: SessionEvent) {
        let sender = self.sender.read().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => {
                if sender.send(event).is_err() {
                    debug!("Event subscriber has gone away, dropping event");
                }
            }
            None => debug!("No event subscriber, dropping event"),
        }
    }

    fn replace(&self, new_sender: mpsc::UnboundedSender<SessionEvent>) {
        let mut sender = self.sender.write().unwrap_or_else(PoisonError::into_inner);
        *sender = Some(new_sender);
    }
}

/// A single serial connection plus its background receive thread.
///
/// A session starts out closed. [`Session::start`] opens the port and spawns the
/// receive loop, [`Session::stop`] signals the loop, waits for it to exit and only
/// then releases the port. Dropping an open session stops it.
pub struct Session {
    config: SessionConfig,
    connector: Arc<dyn Connector>,
    running: Arc<AtomicBool>,
    /// Held only while running; the lock serializes writes against close
    writer: Mutex<Option<LinkWriter>>,
    receiver: Option<JoinHandle<()>>,
    sink: EventSink,
    counters: Arc<Counters>,
}

impl Session {
    /// Create a closed session for a hardware serial port
    pub fn open(config: SessionConfig) -> Self {
        Self::with_connector(config, Arc::new(SerialPortConnector))
    }

    /// Create a closed session that opens its link through `connector`
    pub fn with_connector(config: SessionConfig, connector: Arc<dyn Connector>) -> Self {
        Self {
            config,
            connector,
            running: Arc::new(AtomicBool::new(false)),
            writer: Mutex::new(None),
            receiver: None,
            sink: EventSink::default(),
            counters: Arc::new(Counters::default()),
        }
    }

    /// Register the channel events are delivered to, replacing any earlier one
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.sink.replace(sender);
        receiver
    }

    /// Open the port and spawn the receive loop; a no-op if already running
    pub fn start(&mut self) -> SerialTermResult<()> {
        if self.is_running() {
            debug!("Session for '{}' already running", self.config.port_id);
            return Ok(());
        }

        let link = self
            .connector
            .connect(&self.config)
            .map_err(|source| {
                warn!("Failed to open '{}': {}", self.config.port_id, source);
                SerialTermError::Connect {
                    port: self.config.port_id.clone(),
                    source,
                }
            })?;

        self.running.store(true, Ordering::Release);

        let receive_loop = ReceiveLoop {
            port_id: self.config.port_id.clone(),
            reader: link.reader,
            running: Arc::clone(&self.running),
            sink: self.sink.clone(),
            counters: Arc::clone(&self.counters),
        };

        let handle = thread::Builder::new()
            .name(format!("serial-rx {}", self.config.port_id))
            .spawn(move || receive_loop.run());

        match handle {
            Ok(handle) => {
                *self.lock_writer() = Some(link.writer);
                self.receiver = Some(handle);
                info!(
                    "Opened '{}' at {} baud via {}",
                    self.config.port_id,
                    self.config.baud_rate,
                    self.connector.name()
                );
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                error!("Failed to spawn receive loop for '{}': {}", self.config.port_id, e);
                Err(SerialTermError::Io(e))
            }
        }
    }

    /// Stop the receive loop and close the port; a no-op if not running
    pub fn stop(&mut self) {
        let was_running = self.running.swap(false, Ordering::AcqRel);

        self.join_receiver();

        let writer = self.lock_writer().take();
        drop(writer);

        if was_running {
            info!("Closed '{}'", self.config.port_id);
        }
    }

    /// Write `payload` as UTF-8 exactly as given, without adding a line terminator
    pub fn send(&self, payload: &str) -> SerialTermResult<()> {
        if !self.is_running() {
            return Err(SerialTermError::NotConnected);
        }

        if payload.is_empty() {
            return Ok(());
        }

        {
            let mut guard = self.lock_writer();
            let writer = guard.as_mut().ok_or(SerialTermError::NotConnected)?;

            writer
                .write_all(payload.as_bytes())
                .and_then(|_| writer.flush())
                .map_err(|e| {
                    warn!("Failed to write to '{}': {}", self.config.port_id, e);
                    SerialTermError::Send(e)
                })?;
        }

        debug!("Sent {} bytes to '{}'", payload.len(), self.config.port_id);
        self.counters.record_sent(payload.len());
        self.sink.emit(SessionEvent::Sent(OutboundEvent::now(payload)));

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn state(&self) -> SessionState {
        if self.is_running() {
            SessionState::Open
        } else {
            SessionState::Closed
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn statistics(&self) -> SessionStatistics {
        self.counters.snapshot()
    }

    fn join_receiver(&mut self) {
        if let Some(handle) = self.receiver.take() {
            if handle.join().is_err() {
                error!("Receive loop for '{}' panicked", self.config.port_id);
            }
        }
    }

    fn lock_writer(&self) -> MutexGuard<'_, Option<LinkWriter>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
