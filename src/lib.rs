//! SerialTerm Library
//!
//! Serial port terminal core: port enumeration and a serial session with a
//! background receive loop that delivers newline-delimited text as events.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::communication::{
    Connector, DisplayOptions, InboundEvent, Link, OutboundEvent, SessionEvent,
};
pub use crate::core::session::{Session, SessionState, SessionStatistics};
pub use domain::config::{SerialTermConfig, SessionConfig};
pub use domain::error::{SerialTermError, SerialTermResult};
pub use infrastructure::serial::{list_ports, PortDescriptor};
