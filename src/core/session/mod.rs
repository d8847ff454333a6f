// Session module - Serial session lifecycle and receive loop
mod receiver;
pub mod session;
pub mod state;

pub use session::Session;
pub use state::{SessionState, SessionStatistics};
