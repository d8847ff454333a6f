// Communication module - Transport seam, line assembly and session events
pub mod lines;
pub mod message;
pub mod transport;

pub use lines::LineBuffer;
pub use message::{DisplayOptions, InboundEvent, OutboundEvent, SessionEvent};
pub use transport::{Connector, Link};
