//! Serial port discovery
//!
//! Picks the port the device is most likely on from the USB descriptors
//! the OS reports.

use serialport::SerialPortType;

/// Descriptor fragments that identify a supported board (lowercase)
const DEVICE_HINTS: [&str; 5] = ["micro:bit", "microbit", "mbed", "bbc", "pico"];

/// One port as reported by the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub name: String,
    /// Product, manufacturer and hardware id joined together
    pub description: String,
}

/// Outcome of automatic port selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Descriptor matched a known board
    Matched(String),
    /// Only one port exists
    Sole(String),
    /// Several ports and none matched, the first one was taken
    Guessed { name: String, all: Vec<String> },
    /// No ports at all
    Nothing,
}

impl Selection {
    /// Port to open, if any
    pub fn port(&self) -> Option<&str> {
        match self {
            Selection::Matched(name)
            | Selection::Sole(name)
            | Selection::Guessed { name, .. } => Some(name.as_str()),
            Selection::Nothing => None,
        }
    }

    /// Note for the status line when the pick was a guess
    pub fn warning(&self) -> Option<String> {
        match self {
            Selection::Guessed { name, all } => Some(format!(
                "Guessed {name} from {}, use --port if wrong",
                all.join(", ")
            )),
            _ => None,
        }
    }
}

/// Choose a port from the candidates
pub fn select_port(candidates: &[PortCandidate]) -> Selection {
    let matched = candidates.iter().find(|c| {
        let description = c.description.to_lowercase();
        DEVICE_HINTS.iter().any(|hint| description.contains(hint))
    });
    if let Some(port) = matched {
        return Selection::Matched(port.name.clone());
    }

    match candidates {
        [] => Selection::Nothing,
        [only] => Selection::Sole(only.name.clone()),
        [first, ..] => Selection::Guessed {
            name: first.name.clone(),
            all: candidates.iter().map(|c| c.name.clone()).collect(),
        },
    }
}

/// List the ports the OS knows about
pub fn list_candidates() -> serialport::Result<Vec<PortCandidate>> {
    let ports = serialport::available_ports()?;

    Ok(ports
        .into_iter()
        .map(|info| {
            let description = match info.port_type {
                SerialPortType::UsbPort(usb) => format!(
                    "{} {} USB VID:PID={:04X}:{:04X} SER={}",
                    usb.product.unwrap_or_default(),
                    usb.manufacturer.unwrap_or_default(),
                    usb.vid,
                    usb.pid,
                    usb.serial_number.unwrap_or_default()
                ),
                SerialPortType::PciPort => "PCI".into(),
                SerialPortType::BluetoothPort => "Bluetooth".into(),
                SerialPortType::Unknown => String::new(),
            };
            PortCandidate {
                name: info.port_name,
                description,
            }
        })
        .collect())
}
