//! Display geometry and the frame bitmap
//!
//! A [`Frame`] is a rectangular on/off bitmap with exactly [`ROWS`] rows.
//! Logical frames (a whole rendered string) may be any width; device frames
//! are exactly [`COLS`] wide. Geometry is checked when a frame is built, so
//! every row of a frame always has the same length.

use crate::error::{Error, Result};
use std::fmt;

/// Number of LED rows on the board
pub const ROWS: usize = 6;

/// Number of LED columns on the board (device frame width)
pub const COLS: usize = 64;

/// Rectangular boolean bitmap, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    cells: Vec<bool>,
}

impl Frame {
    /// All-unlit frame of the given width
    pub fn blank(width: usize) -> Self {
        Self {
            width,
            cells: vec![false; width * ROWS],
        }
    }

    /// All-lit frame of the given width
    pub fn lit(width: usize) -> Self {
        Self {
            width,
            cells: vec![true; width * ROWS],
        }
    }

    /// Build a frame by evaluating `f(row, col)` for every cell
    pub fn from_fn(width: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width * ROWS);
        for row in 0..ROWS {
            for col in 0..width {
                cells.push(f(row, col));
            }
        }
        Self { width, cells }
    }

    /// Build a frame from explicit rows
    ///
    /// Fails with [`Error::InvalidGeometry`] unless there are exactly
    /// [`ROWS`] rows of equal length.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self> {
        if rows.len() != ROWS {
            return Err(Error::InvalidGeometry(format!(
                "expected {} rows, got {}",
                ROWS,
                rows.len()
            )));
        }

        let width = rows[0].len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(Error::InvalidGeometry(format!(
                "row {} has {} columns, row 0 has {}",
                index,
                row.len(),
                width
            )));
        }

        Ok(Self {
            width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cell value, or `None` outside the frame
    pub fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row < ROWS && col < self.width {
            Some(self.cells[row * self.width + col])
        } else {
            None
        }
    }

    /// One row of cells
    ///
    /// # Panics
    ///
    /// Panics if `row >= ROWS`.
    pub fn row(&self, row: usize) -> &[bool] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// Iterate over rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        (0..ROWS).map(move |r| self.row(r))
    }

    /// One column of cells, top to bottom
    pub fn column(&self, col: usize) -> Option<[bool; ROWS]> {
        if col >= self.width {
            return None;
        }
        let mut out = [false; ROWS];
        for (row, cell) in out.iter_mut().enumerate() {
            *cell = self.cells[row * self.width + col];
        }
        Some(out)
    }

    /// `COLS`-wide view starting at column `start`
    ///
    /// Columns past the right edge of the frame read as unlit.
    pub fn window(&self, start: usize) -> Frame {
        Frame::from_fn(COLS, |row, col| self.get(row, start + col).unwrap_or(false))
    }

    /// True if every cell is unlit
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| !c)
    }

    /// Row rendered with `*` for lit cells and a space for unlit ones
    pub fn row_string(&self, row: usize) -> String {
        self.row(row).iter().map(|&c| if c { '*' } else { ' ' }).collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            if row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", self.row_string(row))?;
        }
        Ok(())
    }
}
