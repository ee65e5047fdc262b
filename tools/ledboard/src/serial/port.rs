//! Serial port configuration and connection management

use crate::sink::{DEFAULT_PORT, NOMINAL_BAUD};
use anyhow::{Context, Result};
use colored::Colorize;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Write};
use std::time::Duration;

/// Configuration for the board's serial link
#[derive(Debug, Clone)]
pub struct PortConfig {
    /// Serial port path (e.g., /dev/ttyUSB0, /dev/ttyACM0)
    pub port_path: String,
    /// Baud rate (the board firmware runs at 38400)
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub flow_control: FlowControl,
    /// Write timeout
    pub timeout: Duration,
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            port_path: String::from(DEFAULT_PORT),
            baud_rate: NOMINAL_BAUD,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::None,
            timeout: Duration::from_secs(1),
        }
    }
}

impl PortConfig {
    pub fn new(port_path: &str) -> Self {
        Self {
            port_path: port_path.to_string(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Open serial link to the board
///
/// Implements [`Write`], so it plugs into a
/// [`WriterSink`](crate::sink::WriterSink).
pub struct SerialConnection {
    port: Box<dyn SerialPort>,
}

impl SerialConnection {
    pub fn open(config: PortConfig) -> Result<Self> {
        let port = serialport::new(&config.port_path, config.baud_rate)
            .data_bits(config.data_bits)
            .parity(config.parity)
            .stop_bits(config.stop_bits)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .with_context(|| format!("Failed to open serial port: {}", config.port_path))?;

        log::info!("Opened {} at {} baud", config.port_path, config.baud_rate);

        Ok(Self { port })
    }
}

impl Write for SerialConnection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush()
    }
}

/// USB vendor IDs of the common USB-to-serial bridge chips
const SERIAL_BRIDGE_VIDS: &[(u16, &str)] = &[
    (0x0403, "FTDI"),
    (0x067b, "Prolific"),
    (0x10c4, "Silicon Labs CP210x"),
    (0x1a86, "WCH CH34x"),
];

/// A detected serial port
#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    pub path: String,
    /// USB vendor and product ID, for USB ports
    pub usb_id: Option<(u16, u16)>,
    pub product: Option<String>,
}

impl PortInfo {
    /// Bridge chip name when the port looks like the board's adapter
    pub fn bridge(&self) -> Option<&'static str> {
        let (vid, _) = self.usb_id?;
        SERIAL_BRIDGE_VIDS
            .iter()
            .find(|(known, _)| *known == vid)
            .map(|(_, name)| *name)
    }
}

/// List all available serial ports, likely board adapters first
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;

    let mut ports: Vec<PortInfo> = ports
        .into_iter()
        .map(|p| match p.port_type {
            serialport::SerialPortType::UsbPort(info) => PortInfo {
                path: p.port_name,
                usb_id: Some((info.vid, info.pid)),
                product: info.product,
            },
            _ => PortInfo {
                path: p.port_name,
                usb_id: None,
                product: None,
            },
        })
        .collect();

    ports.sort_by_key(|p| p.bridge().is_none());
    Ok(ports)
}

/// Print the detected ports, flagging likely board adapters
pub fn print_ports() -> Result<()> {
    let ports = list_ports()?;

    if ports.is_empty() {
        println!("{}", "No serial ports found".yellow());
        println!("  Connect the board's USB-to-serial adapter and check dmesg");
        return Ok(());
    }

    println!("{}", "Serial Ports:".green().bold());
    for port in &ports {
        let mut line = format!("  {}", port.path.white().bold());
        if let Some((vid, pid)) = port.usb_id {
            line.push_str(&format!("  {:04x}:{:04x}", vid, pid));
        }
        if let Some(product) = &port.product {
            line.push_str(&format!("  {}", product));
        }
        if let Some(bridge) = port.bridge() {
            line.push_str(&format!("  {}", format!("<- {} adapter", bridge).cyan()));
        }
        println!("{}", line);
    }

    println!("\n{}", "Use: ledboard --port <PORT> show <TEXT>".yellow());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PortConfig::default();
        assert_eq!(config.baud_rate, 38400);
        assert_eq!(config.port_path, DEFAULT_PORT);
        assert_eq!(config.flow_control, FlowControl::None);
    }

    #[test]
    fn test_config_builder() {
        let config = PortConfig::new("/dev/ttyACM0")
            .with_baud_rate(9600)
            .with_timeout(Duration::from_millis(250));

        assert_eq!(config.port_path, "/dev/ttyACM0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_bridge_detection() {
        let ftdi = PortInfo {
            path: "/dev/ttyUSB0".to_string(),
            usb_id: Some((0x0403, 0x6001)),
            product: Some("FT232R USB UART".to_string()),
        };
        assert_eq!(ftdi.bridge(), Some("FTDI"));

        let cdc = PortInfo {
            path: "/dev/ttyACM0".to_string(),
            usb_id: Some((0x2e8a, 0x000a)),
            product: None,
        };
        assert_eq!(cdc.bridge(), None);

        let onboard = PortInfo {
            path: "/dev/ttyS0".to_string(),
            usb_id: None,
            product: None,
        };
        assert_eq!(onboard.bridge(), None);
    }
}
