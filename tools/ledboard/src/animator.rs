//! Scroll animation
//!
//! Turns a logical frame into the timed sequence of device frames that
//! realizes it on the board:
//!
//! - column shift: a [`COLS`]-wide window slides one column per step across
//!   the frame, `max(width - COLS, 1)` positions in total
//! - row shift: when a previous device frame exists, the first window is not
//!   shown directly. Instead [`ROWS`] intermediate frames scroll the old
//!   contents up and out while the new window comes in from the bottom.
//!
//! The sequence is produced lazily by [`Scroll`]; nothing is written or
//! slept here.

use crate::frame::{Frame, COLS, ROWS};
use std::time::Duration;

/// Delays applied between device frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    /// After each row-shift intermediate frame
    pub row_shift: Duration,
    /// After each column-shift window
    pub col_shift: Duration,
    /// Extra pause after a row-shift transition into a frame that will scroll
    pub init_hold: Duration,
}

/// One device frame and how long to leave it up before the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub frame: Frame,
    pub delay: Duration,
}

/// Number of window positions for a logical frame of `width` columns
pub fn window_count(width: usize) -> usize {
    width.saturating_sub(COLS).max(1)
}

/// Intermediate frame `step` (0-based) of the row shift from `last` to `now`
///
/// Rows `step + 1..ROWS` of `last` sit on top of rows `0..=step` of `now`,
/// so the final step is exactly `now`.
pub fn row_shift_frame(last: &Frame, now: &Frame, step: usize) -> Frame {
    let kept = ROWS - 1 - step.min(ROWS - 1);
    Frame::from_fn(COLS, |row, col| {
        if row < kept {
            last.get(row + ROWS - kept, col).unwrap_or(false)
        } else {
            now.get(row - kept, col).unwrap_or(false)
        }
    })
}

/// Lazy, restartable sequence of device frames for one logical frame
#[derive(Debug, Clone)]
pub struct Scroll<'a> {
    frame: &'a Frame,
    pacing: Pacing,
    windows: usize,
    next_window: usize,
    /// Previous device frame and the first window, while the row shift plays
    transition: Option<(Frame, Frame)>,
    next_shift: usize,
}

impl<'a> Scroll<'a> {
    /// Animate `frame`, transitioning from `last` when one is given
    pub fn new(frame: &'a Frame, last: Option<&Frame>, pacing: Pacing) -> Self {
        if frame.width() < COLS {
            log::warn!(
                "Logical frame is {} columns wide, padding to {}",
                frame.width(),
                COLS
            );
        }

        let windows = window_count(frame.width());
        log::debug!(
            "Scrolling frame: width={} windows={} row_shift={}",
            frame.width(),
            windows,
            last.is_some()
        );

        Self {
            frame,
            pacing,
            windows,
            next_window: 0,
            transition: last.map(|l| (l.clone(), frame.window(0))),
            next_shift: 0,
        }
    }

    /// The last device frame the sequence ends on
    ///
    /// Callers thread this into the next [`Scroll`] as its `last`.
    pub fn final_window(&self) -> Frame {
        self.frame.window(self.windows - 1)
    }
}

impl Iterator for Scroll<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.next_window >= self.windows {
            return None;
        }

        if self.next_window == 0 {
            if let Some((last, first)) = &self.transition {
                let step = self.next_shift;
                let mut delay = self.pacing.row_shift;
                self.next_shift += 1;

                if self.next_shift == ROWS {
                    if self.frame.width() > COLS {
                        delay += self.pacing.init_hold;
                    }
                    self.next_window = 1;
                }

                return Some(Step {
                    frame: row_shift_frame(last, first, step),
                    delay,
                });
            }
        }

        let frame = self.frame.window(self.next_window);
        self.next_window += 1;
        Some(Step {
            frame,
            delay: self.pacing.col_shift,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let mut remaining = self.windows - self.next_window;
        if self.next_window == 0 && self.transition.is_some() {
            remaining = remaining - 1 + (ROWS - self.next_shift);
        }
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Scroll<'_> {}

/// Device frame sequence for `frame` plus the new "last" frame to carry on
pub fn animate<'a>(last: Option<&Frame>, frame: &'a Frame, pacing: Pacing) -> (Scroll<'a>, Frame) {
    let scroll = Scroll::new(frame, last, pacing);
    let next_last = scroll.final_window();
    (scroll, next_last)
}
