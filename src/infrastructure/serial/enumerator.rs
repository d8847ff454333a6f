use crate::domain::error::{SerialTermError, SerialTermResult};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};
use tabled::Tabled;
use tracing::debug;

/// Separator between id and label in the display form
const DISPLAY_SEPARATOR: &str = " - ";

/// An enumerated serial device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct PortDescriptor {
    /// OS device path or name
    #[tabled(rename = "Port")]
    pub id: String,
    /// Human-readable description
    #[tabled(rename = "Description")]
    pub label: String,
}

impl PortDescriptor {
    /// Recover the port id from `"{id} - {label}"`, or return the input unchanged
    pub fn parse_display(display: &str) -> &str {
        display
            .split_once(DISPLAY_SEPARATOR)
            .map_or(display, |(id, _)| id)
            .trim()
    }
}

impl std::fmt::Display for PortDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.id, DISPLAY_SEPARATOR, self.label)
    }
}

impl From<SerialPortInfo> for PortDescriptor {
    fn from(info: SerialPortInfo) -> Self {
        let label = describe(&info.port_type);
        Self {
            id: info.port_name,
            label,
        }
    }
}

fn describe(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(usb) => usb
            .product
            .clone()
            .or_else(|| usb.manufacturer.clone())
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| format!("USB {:04x}:{:04x}", usb.vid, usb.pid)),
        SerialPortType::PciPort => "PCI device".to_string(),
        SerialPortType::BluetoothPort => "Bluetooth device".to_string(),
        SerialPortType::Unknown => "n/a".to_string(),
    }
}

/// Query the host for serial devices. An empty list is not an error.
pub fn list_ports() -> SerialTermResult<Vec<PortDescriptor>> {
    let ports = serialport::available_ports().map_err(SerialTermError::Enumeration)?;
    let descriptors = descriptors_from(ports);

    debug!("Found {} serial ports", descriptors.len());
    Ok(descriptors)
}

fn descriptors_from(ports: Vec<SerialPortInfo>) -> Vec<PortDescriptor> {
    let mut descriptors: Vec<PortDescriptor> =
        ports.into_iter().map(PortDescriptor::from).collect();
    descriptors.sort_by(|a, b| a.id.cmp(&b.id));
    descriptors
}
