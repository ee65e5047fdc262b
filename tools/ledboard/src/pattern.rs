//! Hardware check patterns
//!
//! Fixed device frames for bring-up: every LED on, and a sweep that lights
//! each row and then each column in turn so dead LEDs and swapped lines are
//! easy to spot.

use crate::error::Result;
use crate::frame::{Frame, COLS, ROWS};
use crate::render::Player;
use std::time::Duration;

/// How long each row of the sweep stays lit
pub const ROW_SWEEP_DELAY: Duration = Duration::from_millis(100);

/// How long each column of the sweep stays lit
pub const COL_SWEEP_DELAY: Duration = Duration::from_millis(50);

/// Every LED lit
pub fn all_on() -> Frame {
    Frame::lit(COLS)
}

/// One pass of the sweep: each row, then each column
pub fn sweep() -> impl Iterator<Item = (Frame, Duration)> {
    let rows = (0..ROWS).map(|lit| (Frame::from_fn(COLS, move |row, _| row == lit), ROW_SWEEP_DELAY));
    let cols = (0..COLS).map(|lit| (Frame::from_fn(COLS, move |_, col| col == lit), COL_SWEEP_DELAY));
    rows.chain(cols)
}

/// Light every LED once
pub fn show_all_on(player: &mut Player<'_>) -> Result<()> {
    player.show(&all_on(), Duration::ZERO)
}

/// Run the sweep `cycles` times, or forever when `None`
pub fn run_test_pattern(player: &mut Player<'_>, cycles: Option<usize>) -> Result<()> {
    let mut cycle = 0;
    while cycles.map_or(true, |n| cycle < n) {
        log::debug!("Test pattern cycle {}", cycle + 1);
        for (frame, delay) in sweep() {
            player.show(&frame, delay)?;
        }
        cycle += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::sink::{RecordingSink, RecordingSleeper};

    #[test]
    fn test_all_on_encodes_to_all_ones() {
        let enc = encode(&all_on()).unwrap();
        assert!(enc.as_bytes().iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_sweep_lights_one_line_at_a_time() {
        let steps: Vec<(Frame, Duration)> = sweep().collect();
        assert_eq!(steps.len(), ROWS + COLS);

        let (row3, delay) = &steps[3];
        assert_eq!(*delay, ROW_SWEEP_DELAY);
        assert!(row3.row(3).iter().all(|&c| c));
        assert!(row3.row(2).iter().all(|&c| !c));

        let (col10, delay) = &steps[ROWS + 10];
        assert_eq!(*delay, COL_SWEEP_DELAY);
        assert_eq!(col10.column(10), Some([true; ROWS]));
        assert_eq!(col10.column(11), Some([false; ROWS]));
    }

    #[test]
    fn test_run_test_pattern_cycles() {
        let mut sink = RecordingSink::new();
        let mut sleeper = RecordingSleeper::default();

        let mut player = Player::new(&mut sink, &mut sleeper);
        run_test_pattern(&mut player, Some(2)).unwrap();
        show_all_on(&mut player).unwrap();

        assert_eq!(sink.frames.len(), 2 * (ROWS + COLS) + 1);
        assert_eq!(sink.frames.last(), Some(&all_on()));
        assert_eq!(
            sleeper.total(),
            (ROW_SWEEP_DELAY * ROWS as u32 + COL_SWEEP_DELAY * COLS as u32) * 2
        );
    }
}
