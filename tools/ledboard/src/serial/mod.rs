//! Serial transport for the LED board
//!
//! The board listens on a plain UART: 38400 baud, 8N1, no flow control and
//! no acknowledgements. Frames are written back to back with no framing.

pub mod port;

pub use port::{list_ports, print_ports, PortConfig, SerialConnection};
