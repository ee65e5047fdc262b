//! Host driver for the 6x64 UART LED display board
//!
//! Text is rendered into bitmap frames with a glyph table, animated with
//! column scrolling and row-shift transitions, packed into the board's
//! 48-byte wire format and written to a serial link (or drawn as ASCII art
//! for testing without hardware).
//!
//! ```no_run
//! use ledboard::font::DEFAULT_FONT;
//! use ledboard::render::{render, Player, RenderOptions};
//! use ledboard::sink::{SimulatorSink, ThreadSleeper};
//!
//! let mut sink = SimulatorSink::new(std::io::stdout());
//! let mut sleeper = ThreadSleeper;
//! let mut player = Player::new(&mut sink, &mut sleeper);
//! render(&mut player, &*DEFAULT_FONT, &["HELLO WORLD"], &RenderOptions::default())?;
//! # Ok::<(), ledboard::Error>(())
//! ```

pub mod animator;
pub mod builder;
pub mod config;
pub mod encoder;
pub mod error;
pub mod font;
pub mod frame;
pub mod pattern;
pub mod render;
#[cfg(feature = "serial")]
pub mod serial;
pub mod sink;

pub use error::{Error, Result};
pub use frame::{Frame, COLS, ROWS};
