//! Text to logical frame rendering
//!
//! Strings are padded with trailing spaces to at least [`MIN_CHARS`]
//! characters and then to an even count, so a frame is always at least one
//! display wide and its width is a multiple of 8 with the built-in font.

use crate::error::{Error, Result};
use crate::font::{GlyphSource, FIRST_CODE};
use crate::frame::{Frame, ROWS};

/// Minimum number of characters in a rendered string
pub const MIN_CHARS: usize = 16;

/// Pad `text` with spaces to at least [`MIN_CHARS`] characters, then to an
/// even character count
pub fn pad_text(text: &str) -> String {
    let mut padded = text.to_string();
    let mut count = padded.chars().count();

    if count < MIN_CHARS {
        padded.extend(std::iter::repeat(' ').take(MIN_CHARS - count));
        count = MIN_CHARS;
    }
    if count % 2 != 0 {
        padded.push(' ');
    }

    padded
}

/// Renders strings into logical frames using a glyph table
pub struct FrameBuilder<'a> {
    font: &'a dyn GlyphSource,
}

impl<'a> FrameBuilder<'a> {
    pub fn new(font: &'a dyn GlyphSource) -> Self {
        Self { font }
    }

    /// Render one string into a logical frame
    ///
    /// Fails with [`Error::InvalidCharacter`] on the first character the
    /// glyph table has no entry for.
    pub fn build(&self, text: &str) -> Result<Frame> {
        let padded = pad_text(text);
        let width = padded.chars().count() * self.font.glyph_width();
        let mut rows: Vec<Vec<bool>> = (0..ROWS).map(|_| Vec::with_capacity(width)).collect();

        for (position, ch) in padded.chars().enumerate() {
            let glyph = (ch as u32)
                .checked_sub(FIRST_CODE)
                .and_then(|index| self.font.glyph(index as usize))
                .ok_or(Error::InvalidCharacter { ch, position })?;

            for (row, out) in rows.iter_mut().enumerate() {
                out.extend_from_slice(glyph.row(row));
            }
        }

        Frame::from_rows(rows)
    }

    /// Render each string into its own logical frame
    pub fn build_all<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Frame>> {
        texts.iter().map(|t| self.build(t.as_ref())).collect()
    }
}
