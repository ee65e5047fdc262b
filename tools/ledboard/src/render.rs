//! Caller-facing rendering
//!
//! [`render`] takes a batch of strings through the whole pipeline: build
//! every logical frame, optionally clip them to the display, then animate
//! each one into the sink, threading the last device frame from one string
//! to the next so transitions stay continuous.

use crate::animator::{animate, Pacing};
use crate::builder::FrameBuilder;
use crate::error::Result;
use crate::font::GlyphSource;
use crate::frame::{Frame, COLS};
use crate::sink::{OutputSink, Sleeper};
use std::io::BufRead;
use std::time::Duration;

/// Options for a render run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Clip each string to the display instead of scrolling it
    pub truncate: bool,
    /// Row-shift in from a blank display at the start
    pub row_shift_in: bool,
    /// Row-shift out to a blank display at the end
    pub row_shift_out: bool,
    /// Delay between row-shift intermediate frames
    pub row_shift: Duration,
    /// Delay between column-shift windows
    pub col_shift: Duration,
    /// Pause after a row shift into a string that will scroll
    pub row_in_hold: Duration,
    /// Pause after shifting out at the end
    pub row_out_hold: Duration,
    /// Pause after each string
    pub hold_time: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            truncate: false,
            row_shift_in: false,
            row_shift_out: false,
            row_shift: Duration::from_millis(50),
            col_shift: Duration::from_millis(10),
            row_in_hold: Duration::from_secs(1),
            row_out_hold: Duration::from_secs(1),
            hold_time: Duration::ZERO,
        }
    }
}

impl RenderOptions {
    /// Pacing used for every string and the shift-in bookend
    pub fn pacing(&self) -> Pacing {
        Pacing {
            row_shift: self.row_shift,
            col_shift: self.col_shift,
            init_hold: self.row_in_hold,
        }
    }

    /// Pacing for the shift-out bookend, which never holds
    fn shift_out_pacing(&self) -> Pacing {
        Pacing {
            init_hold: Duration::ZERO,
            ..self.pacing()
        }
    }

    fn prepare(&self, frame: Frame) -> Frame {
        if self.truncate {
            frame.window(0)
        } else {
            frame
        }
    }
}

/// Drives a sink, sleeping between device frames
pub struct Player<'a> {
    sink: &'a mut dyn OutputSink,
    sleeper: &'a mut dyn Sleeper,
    frames: usize,
}

impl<'a> Player<'a> {
    pub fn new(sink: &'a mut dyn OutputSink, sleeper: &'a mut dyn Sleeper) -> Self {
        Self {
            sink,
            sleeper,
            frames: 0,
        }
    }

    /// Device frames delivered so far
    pub fn frames_shown(&self) -> usize {
        self.frames
    }

    /// Show a single device frame, then wait
    pub fn show(&mut self, frame: &Frame, delay: Duration) -> Result<()> {
        self.sink.write_frame(frame)?;
        self.frames += 1;
        self.sleeper.sleep(delay);
        Ok(())
    }

    /// Wait without changing the display
    pub fn hold(&mut self, delay: Duration) {
        self.sleeper.sleep(delay);
    }

    /// Animate one logical frame, returning the device frame it ends on
    pub fn play(&mut self, last: Option<&Frame>, frame: &Frame, pacing: Pacing) -> Result<Frame> {
        let (steps, next_last) = animate(last, frame, pacing);
        for step in steps {
            self.show(&step.frame, step.delay)?;
        }
        Ok(next_last)
    }
}

/// Render a batch of strings
///
/// Every string is built before anything is shown, so an invalid character
/// anywhere in the batch produces no output at all. Returns the device frame
/// left on the display.
pub fn render<S: AsRef<str>>(
    player: &mut Player<'_>,
    font: &dyn GlyphSource,
    strings: &[S],
    options: &RenderOptions,
) -> Result<Option<Frame>> {
    let builder = FrameBuilder::new(font);
    let frames: Vec<Frame> = builder
        .build_all(strings)?
        .into_iter()
        .map(|f| options.prepare(f))
        .collect();

    log::debug!("Rendering {} string(s)", frames.len());

    let mut last = shift_in(player, options)?;
    for frame in &frames {
        last = Some(player.play(last.as_ref(), frame, options.pacing())?);
        player.hold(options.hold_time);
    }
    let last = shift_out(player, last, options)?;

    log::info!("Render complete: {} device frames", player.frames_shown());
    Ok(last)
}

/// Render lines from `input` as they arrive, until end of input
///
/// Trailing whitespace is stripped from each line. A line with an invalid
/// character aborts the run.
pub fn render_lines<R: BufRead>(
    player: &mut Player<'_>,
    font: &dyn GlyphSource,
    input: R,
    options: &RenderOptions,
) -> anyhow::Result<Option<Frame>> {
    let builder = FrameBuilder::new(font);
    let mut last = shift_in(player, options)?;

    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let text = line.trim_end();
        let frame = builder
            .build(text)
            .map_err(|e| anyhow::anyhow!("line {}: {}", number + 1, e))?;

        log::debug!("Rendering line {}: {:?}", number + 1, text);
        last = Some(player.play(last.as_ref(), &options.prepare(frame), options.pacing())?);
        player.hold(options.hold_time);
    }

    let last = shift_out(player, last, options)?;
    log::info!("Input exhausted: {} device frames", player.frames_shown());
    Ok(last)
}

fn shift_in(player: &mut Player<'_>, options: &RenderOptions) -> Result<Option<Frame>> {
    if !options.row_shift_in {
        return Ok(None);
    }
    Ok(Some(player.play(None, &Frame::blank(COLS), options.pacing())?))
}

fn shift_out(
    player: &mut Player<'_>,
    last: Option<Frame>,
    options: &RenderOptions,
) -> Result<Option<Frame>> {
    if !options.row_shift_out {
        return Ok(last);
    }
    let blank = player.play(last.as_ref(), &Frame::blank(COLS), options.shift_out_pacing())?;
    player.hold(options.row_out_hold);
    Ok(Some(blank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{decode, encode};
    use crate::error::Error;
    use crate::font::DEFAULT_FONT;
    use crate::frame::ROWS;
    use crate::sink::{RecordingSink, RecordingSleeper};
    use std::io::Cursor;

    fn quick() -> RenderOptions {
        RenderOptions {
            row_shift: Duration::from_millis(5),
            col_shift: Duration::from_millis(1),
            row_in_hold: Duration::from_millis(100),
            row_out_hold: Duration::from_millis(200),
            hold_time: Duration::from_millis(300),
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.row_shift, Duration::from_millis(50));
        assert_eq!(options.col_shift, Duration::from_millis(10));
        assert_eq!(options.pacing().init_hold, Duration::from_secs(1));
        assert_eq!(options.shift_out_pacing().init_hold, Duration::ZERO);
    }

    #[test]
    fn test_truncated_string_is_one_frame() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions {
            truncate: true,
            ..quick()
        };

        let mut player = Player::new(&mut sink, &mut sleeper);
        let last = render(&mut player, &*DEFAULT_FONT, &["HI"], &options).unwrap();
        assert_eq!(player.frames_shown(), 1);
        assert_eq!(sink.frames.len(), 1);

        let expected = FrameBuilder::new(&*DEFAULT_FONT).build("HI").unwrap();
        let wire = encode(&sink.frames[0]).unwrap();
        assert_eq!(decode(wire.as_bytes(), COLS).unwrap(), expected);
        assert_eq!(last, Some(expected));

        // one column-shift delay, then the hold
        assert_eq!(sleeper.delays, vec![Duration::from_millis(1), Duration::from_millis(300)]);
    }

    #[test]
    fn test_truncate_clips_long_strings() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions { truncate: true, ..quick() };
        let text = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

        let mut player = Player::new(&mut sink, &mut sleeper);
        render(&mut player, &*DEFAULT_FONT, &[text], &options).unwrap();

        let full = FrameBuilder::new(&*DEFAULT_FONT).build(text).unwrap();
        assert_eq!(sink.frames, vec![full.window(0)]);
    }

    #[test]
    fn test_invalid_character_shows_nothing() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions {
            row_shift_in: true,
            ..quick()
        };

        let mut player = Player::new(&mut sink, &mut sleeper);
        let err = render(&mut player, &*DEFAULT_FONT, &["FINE", "BAD\u{7}"], &options).unwrap_err();
        assert!(matches!(err, Error::InvalidCharacter { ch: '\u{7}', position: 3 }));
        assert!(sink.frames.is_empty());
        assert!(sleeper.delays.is_empty());
    }

    #[test]
    fn test_transitions_between_strings() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions {
            row_shift_in: true,
            row_shift_out: true,
            ..quick()
        };

        let mut player = Player::new(&mut sink, &mut sleeper);
        let last = render(&mut player, &*DEFAULT_FONT, &["ONE", "TWO"], &options).unwrap();

        // blank bookend (1) + two row shifts into static strings (6 + 6)
        // + row shift out (6)
        assert_eq!(sink.frames.len(), 1 + ROWS * 3);
        assert!(sink.frames[0].is_blank());

        let one = FrameBuilder::new(&*DEFAULT_FONT).build("ONE").unwrap();
        let two = FrameBuilder::new(&*DEFAULT_FONT).build("TWO").unwrap();
        assert_eq!(sink.frames[ROWS], one);
        assert_eq!(sink.frames[2 * ROWS], two);
        // first shift frame out of "ONE" carries its lower rows upward
        assert_eq!(sink.frames[ROWS + 1].row(0), one.row(1));
        assert!(sink.frames.last().unwrap().is_blank());
        assert_eq!(last, Some(Frame::blank(COLS)));

        // bookend window, three row shifts, two string holds, row-out hold
        let expected_total = Duration::from_millis(1)
            + Duration::from_millis(5) * (ROWS as u32 * 3)
            + Duration::from_millis(300) * 2
            + Duration::from_millis(200);
        assert_eq!(sleeper.total(), expected_total);
    }

    #[test]
    fn test_scrolling_string_holds_after_shift() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions {
            row_shift_in: true,
            hold_time: Duration::ZERO,
            ..quick()
        };
        let text = "SCROLLING TEXT WIDER THAN THE BOARD";

        let mut player = Player::new(&mut sink, &mut sleeper);
        render(&mut player, &*DEFAULT_FONT, &[text], &options).unwrap();

        let frame = FrameBuilder::new(&*DEFAULT_FONT).build(text).unwrap();
        let windows = frame.width() - COLS;
        assert_eq!(sink.frames.len(), 1 + ROWS + windows - 1);
        assert_eq!(sleeper.delays[ROWS], Duration::from_millis(105));
        assert_eq!(sink.frames.last(), Some(&frame.window(windows - 1)));
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mut sink = RecordingSink::failing_after(3);
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions {
            row_shift_in: true,
            ..quick()
        };

        let mut player = Player::new(&mut sink, &mut sleeper);
        let err = render(&mut player, &*DEFAULT_FONT, &["HELLO"], &options).unwrap_err();
        assert!(matches!(err, Error::Sink(_)));
        assert_eq!(sink.frames.len(), 3);
    }

    #[test]
    fn test_render_lines_from_reader() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let input = Cursor::new("FIRST   \nSECOND\n");

        let mut player = Player::new(&mut sink, &mut sleeper);
        let last = render_lines(&mut player, &*DEFAULT_FONT, input, &quick()).unwrap();
        assert_eq!(player.frames_shown(), 1 + ROWS);

        let second = FrameBuilder::new(&*DEFAULT_FONT).build("SECOND").unwrap();
        assert_eq!(sink.frames[0], FrameBuilder::new(&*DEFAULT_FONT).build("FIRST").unwrap());
        assert_eq!(last, Some(second));
    }

    #[test]
    fn test_render_lines_stops_on_bad_line() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let input = Cursor::new("GOOD\nTAB\tHERE\nNEVER\n");

        let mut player = Player::new(&mut sink, &mut sleeper);
        let err = render_lines(&mut player, &*DEFAULT_FONT, input, &quick()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn test_render_lines_truncates() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions { truncate: true, ..quick() };
        let text = "THIS LINE IS LONGER THAN SIXTEEN";
        let input = Cursor::new(format!("{}\n", text));

        let mut player = Player::new(&mut sink, &mut sleeper);
        let last = render_lines(&mut player, &*DEFAULT_FONT, input, &options).unwrap();

        let full = FrameBuilder::new(&*DEFAULT_FONT).build(text).unwrap();
        assert!(full.width() > COLS);
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(sink.frames[0].width(), COLS);
        assert_eq!(sink.frames[0], full.window(0));
        assert_eq!(last, Some(full.window(0)));
    }

    #[test]
    fn test_render_lines_with_bookends() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();
        let options = RenderOptions {
            row_shift_in: true,
            row_shift_out: true,
            ..quick()
        };
        let input = Cursor::new("ONE\nTWO\nTHREE\n");

        let mut player = Player::new(&mut sink, &mut sleeper);
        let last = render_lines(&mut player, &*DEFAULT_FONT, input, &options).unwrap();

        assert_eq!(sink.frames.len(), 1 + ROWS * 3 + ROWS);
        assert!(sink.frames[0].is_blank());
        let three = FrameBuilder::new(&*DEFAULT_FONT).build("THREE").unwrap();
        assert_eq!(sink.frames[3 * ROWS], three);
        assert!(sink.frames.last().unwrap().is_blank());
        assert_eq!(last, Some(Frame::blank(COLS)));
        assert_eq!(sleeper.delays.last(), Some(&Duration::from_millis(200)));
    }
}
