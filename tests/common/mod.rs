#![allow(dead_code)]

use serialterm::{Connector, Link, SessionConfig, SessionEvent};
use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Read timeout used by test sessions
pub const READ_TIMEOUT: Duration = Duration::from_millis(50);

type Inbound = Result<Vec<u8>, io::ErrorKind>;

#[derive(Default)]
struct DeviceState {
    inbound: Mutex<Option<Sender<Inbound>>>,
    written: Mutex<Vec<u8>>,
    write_failure: Mutex<Option<io::ErrorKind>>,
    connects: AtomicUsize,
    open_readers: AtomicUsize,
    open_writers: AtomicUsize,
}

/// Test-side view of a fake serial device
#[derive(Clone, Default)]
pub struct DeviceHandle {
    state: Arc<DeviceState>,
}

impl DeviceHandle {
    /// Queue bytes for the session to read
    pub fn feed(&self, bytes: &[u8]) {
        if let Some(sender) = self.state.inbound.lock().unwrap().as_ref() {
            sender.send(Ok(bytes.to_vec())).unwrap();
        }
    }

    /// Make the next read fail with `kind`
    pub fn fail_read(&self, kind: io::ErrorKind) {
        if let Some(sender) = self.state.inbound.lock().unwrap().as_ref() {
            sender.send(Err(kind)).unwrap();
        }
    }

    /// Make every write fail with `kind` from now on
    pub fn fail_write(&self, kind: io::ErrorKind) {
        *self.state.write_failure.lock().unwrap() = Some(kind);
    }

    /// Everything the session wrote, in order
    pub fn written(&self) -> Vec<u8> {
        self.state.written.lock().unwrap().clone()
    }

    pub fn connects(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Reader and writer halves not yet dropped
    pub fn open_handles(&self) -> usize {
        let state = &self.state;
        state.open_readers.load(Ordering::SeqCst) + state.open_writers.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Inbound data comes only from `DeviceHandle::feed`
    Scripted,
    /// Written bytes are echoed back to the reader
    Loopback,
    /// Every connect fails as if the device did not exist
    Missing,
}

pub struct MockConnector {
    device: DeviceHandle,
    mode: Mode,
}

impl MockConnector {
    pub fn new(mode: Mode) -> (Arc<Self>, DeviceHandle) {
        let device = DeviceHandle::default();
        let connector = Arc::new(Self {
            device: device.clone(),
            mode,
        });
        (connector, device)
    }
}

impl Connector for MockConnector {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn connect(&self, config: &SessionConfig) -> serialport::Result<Link> {
        if self.mode == Mode::Missing {
            return Err(serialport::Error::new(
                serialport::ErrorKind::NoDevice,
                format!("{} does not exist", config.port_id),
            ));
        }

        let state = &self.device.state;
        state.connects.fetch_add(1, Ordering::SeqCst);

        let (sender, receiver) = mpsc::channel();
        *state.inbound.lock().unwrap() = Some(sender.clone());

        state.open_readers.fetch_add(1, Ordering::SeqCst);
        state.open_writers.fetch_add(1, Ordering::SeqCst);

        let reader = MockReader {
            receiver,
            timeout: config.read_timeout,
            pending: Vec::new(),
            device: self.device.clone(),
        };
        let writer = MockWriter {
            echo: (self.mode == Mode::Loopback).then_some(sender),
            device: self.device.clone(),
        };

        Ok(Link {
            reader: Box::new(reader),
            writer: Box::new(writer),
        })
    }
}

struct MockReader {
    receiver: Receiver<Inbound>,
    timeout: Duration,
    pending: Vec<u8>,
    device: DeviceHandle,
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            match self.receiver.recv_timeout(self.timeout) {
                Ok(Ok(bytes)) => self.pending = bytes,
                Ok(Err(kind)) => return Err(io::Error::new(kind, "injected read failure")),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"))
                }
                Err(RecvTimeoutError::Disconnected) => {
                    std::thread::sleep(self.timeout);
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
                }
            }
        }

        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

impl Drop for MockReader {
    fn drop(&mut self) {
        self.device.state.open_readers.fetch_sub(1, Ordering::SeqCst);
    }
}

struct MockWriter {
    echo: Option<Sender<Inbound>>,
    device: DeviceHandle,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(kind) = *self.device.state.write_failure.lock().unwrap() {
            return Err(io::Error::new(kind, "injected write failure"));
        }

        self.device.state.written.lock().unwrap().extend_from_slice(buf);
        if let Some(echo) = &self.echo {
            let _ = echo.send(Ok(buf.to_vec()));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for MockWriter {
    fn drop(&mut self) {
        self.device.state.open_writers.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn test_config(port: &str) -> SessionConfig {
    SessionConfig::new(port).with_read_timeout(READ_TIMEOUT)
}

/// Next event, or `None` if nothing arrives within `wait`
pub async fn next_event(
    events: &mut UnboundedReceiver<SessionEvent>,
    wait: Duration,
) -> Option<SessionEvent> {
    tokio::time::timeout(wait, events.recv()).await.ok().flatten()
}

/// Next received payload, skipping sent events
pub async fn next_received(
    events: &mut UnboundedReceiver<SessionEvent>,
    wait: Duration,
) -> Option<String> {
    let deadline = tokio::time::Instant::now() + wait;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        match next_event(events, remaining).await? {
            SessionEvent::Received(inbound) => return Some(inbound.payload),
            _ => continue,
        }
    }
}
