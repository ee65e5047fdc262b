//! Output sinks and pacing
//!
//! The core hands every device frame to an [`OutputSink`] and then waits
//! through a [`Sleeper`]. Sinks only deliver; they never decide timing,
//! except the simulator, which stands in for the time a real frame spends
//! on the wire.

use crate::encoder::{encode, FRAME_BYTES};
use crate::error::{Error, Result};
use crate::frame::Frame;
use std::io::Write;
use std::time::Duration;

/// Nominal board baud rate
pub const NOMINAL_BAUD: u32 = 38_400;

/// Serial device the board's USB-to-serial adapter usually shows up as
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Roughly one encoded frame's transmission time at [`NOMINAL_BAUD`]
pub const SIMULATED_FRAME_TIME: Duration =
    Duration::from_nanos(50 * 1_000_000_000 / NOMINAL_BAUD as u64);

/// Clear screen and home cursor
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Delivers device frames somewhere
pub trait OutputSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        (**self).write_frame(frame)
    }
}

/// Blocks for the delays between frames
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested delays instead of sleeping
#[derive(Debug, Default, Clone)]
pub struct RecordingSleeper {
    pub delays: Vec<Duration>,
}

impl RecordingSleeper {
    pub fn total(&self) -> Duration {
        self.delays.iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.delays.push(duration);
    }
}

/// Writes encoded frames to any byte stream (serial port, pty, file)
pub struct WriterSink<W: Write> {
    writer: W,
    frames: usize,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, frames: 0 }
    }

    /// Frames written so far
    pub fn frames_written(&self) -> usize {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let encoded = encode(frame)?;
        if encoded.len() != FRAME_BYTES {
            return Err(Error::InvalidGeometry(format!(
                "device frame encodes to {} bytes, expected {}",
                encoded.len(),
                FRAME_BYTES
            )));
        }

        self.writer.write_all(encoded.as_bytes()).map_err(Error::Sink)?;
        self.writer.flush().map_err(Error::Sink)?;
        self.frames += 1;
        log::trace!("Wrote frame {} ({} bytes)", self.frames, encoded.len());
        Ok(())
    }
}

/// Draws frames as ASCII art instead of driving hardware
pub struct SimulatorSink<W: Write, S: Sleeper = ThreadSleeper> {
    out: W,
    sleeper: S,
}

impl<W: Write> SimulatorSink<W, ThreadSleeper> {
    pub fn new(out: W) -> Self {
        Self::with_sleeper(out, ThreadSleeper)
    }
}

impl<W: Write, S: Sleeper> SimulatorSink<W, S> {
    pub fn with_sleeper(out: W, sleeper: S) -> Self {
        Self { out, sleeper }
    }

    pub fn into_parts(self) -> (W, S) {
        (self.out, self.sleeper)
    }
}

impl<W: Write, S: Sleeper> OutputSink for SimulatorSink<W, S> {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        write!(self.out, "{}", CLEAR_SCREEN)?;
        for row in 0..crate::frame::ROWS {
            writeln!(self.out, "[ {} ]", frame.row_string(row))?;
        }
        self.out.flush()?;
        self.sleeper.sleep(SIMULATED_FRAME_TIME);
        Ok(())
    }
}

/// Keeps every frame it is given
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<Frame>,
    /// Fail with a broken-pipe error once this many frames were accepted
    pub fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(frames: usize) -> Self {
        Self {
            frames: Vec::new(),
            fail_after: Some(frames),
        }
    }
}

impl OutputSink for RecordingSink {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        if self.fail_after.is_some_and(|n| self.frames.len() >= n) {
            return Err(Error::Sink(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "recording sink closed",
            )));
        }
        self.frames.push(frame.clone());
        Ok(())
    }
}
