// Serial module - Port enumeration and hardware connector
pub mod connector;
pub mod enumerator;

pub use connector::SerialPortConnector;
pub use enumerator::{list_ports, PortDescriptor};
