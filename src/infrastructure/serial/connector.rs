use crate::core::communication::transport::{Connector, Link};
use crate::domain::config::SessionConfig;
use serialport::{DataBits, FlowControl, Parity, StopBits};
use tracing::debug;

/// Opens hardware serial ports through the `serialport` crate, always 8N1
/// without flow control.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialPortConnector;

impl Connector for SerialPortConnector {
    fn name(&self) -> &'static str {
        "serialport"
    }

    fn connect(&self, config: &SessionConfig) -> serialport::Result<Link> {
        let port = serialport::new(&config.port_id, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()?;

        // Independent handle for the receive thread
        let reader = port.try_clone()?;

        debug!(
            "Serial port '{}' opened with {:?} read timeout",
            config.port_id, config.read_timeout
        );

        Ok(Link {
            reader: Box::new(reader),
            writer: Box::new(port),
        })
    }
}
