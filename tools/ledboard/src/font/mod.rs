//! Glyph tables
//!
//! A glyph table is an ordered list of fixed-size bitmaps indexed by
//! `character code - 0x20`. The board ships with a built-in 4x6 table
//! covering printable ASCII; alternative tables can be loaded from text
//! files in the same format as `default_font.txt`:
//!
//! - one glyph per line, in code order starting at U+0020
//! - [`ROWS`] whitespace-separated row tokens, `#` lit and `.` unlit
//! - every token the same (even) width
//! - `;` starts a comment, blank lines are ignored

use crate::error::{Error, Result};
use crate::frame::ROWS;
use anyhow::Context;
use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;

/// Code point of the first glyph in every table
pub const FIRST_CODE: u32 = 0x20;

/// Glyph width of the built-in table
pub const DEFAULT_GLYPH_WIDTH: usize = 4;

static DEFAULT_FONT_SOURCE: &str = include_str!("default_font.txt");

/// Built-in font, parsed on first use
pub static DEFAULT_FONT: Lazy<FontTable> = Lazy::new(|| {
    FontTable::parse(DEFAULT_FONT_SOURCE).unwrap_or_else(|e| panic!("built-in font is malformed: {e}"))
});

/// Anything that maps a table index to a glyph bitmap
pub trait GlyphSource {
    /// Width in columns of every glyph in the table
    fn glyph_width(&self) -> usize;

    /// Glyph at `index` (`character code - 0x20`), if the table has one
    fn glyph(&self, index: usize) -> Option<&Glyph>;

    /// Number of glyphs in the table
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed-size bitmap for one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    width: usize,
    bits: Vec<bool>,
}

impl Glyph {
    pub fn width(&self) -> usize {
        self.width
    }

    /// One row of the glyph
    ///
    /// # Panics
    ///
    /// Panics if `row >= ROWS`.
    pub fn row(&self, row: usize) -> &[bool] {
        let start = row * self.width;
        &self.bits[start..start + self.width]
    }
}

/// Ordered glyph table
#[derive(Debug, Clone)]
pub struct FontTable {
    glyph_width: usize,
    glyphs: Vec<Glyph>,
}

impl FontTable {
    /// Parse a glyph table from its text form
    pub fn parse(source: &str) -> Result<Self> {
        let mut glyph_width = None;
        let mut glyphs = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let content = raw.split(';').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let tokens: Vec<&str> = content.split_whitespace().collect();
            if tokens.len() != ROWS {
                return Err(Error::Font {
                    line,
                    message: format!("expected {} row tokens, found {}", ROWS, tokens.len()),
                });
            }

            let width = *glyph_width.get_or_insert(tokens[0].chars().count());
            if width == 0 || width % 2 != 0 {
                return Err(Error::Font {
                    line,
                    message: format!("glyph width must be even and non-zero, found {}", width),
                });
            }

            let mut bits = Vec::with_capacity(width * ROWS);
            for token in tokens {
                if token.chars().count() != width {
                    return Err(Error::Font {
                        line,
                        message: format!("row {:?} is not {} columns wide", token, width),
                    });
                }
                for c in token.chars() {
                    match c {
                        '#' => bits.push(true),
                        '.' => bits.push(false),
                        other => {
                            return Err(Error::Font {
                                line,
                                message: format!("unexpected {:?} in row token", other),
                            })
                        }
                    }
                }
            }

            glyphs.push(Glyph { width, bits });
        }

        let glyph_width = glyph_width.ok_or(Error::Font {
            line: 0,
            message: "table contains no glyphs".to_string(),
        })?;

        log::debug!("Parsed glyph table: {} glyphs, {} columns wide", glyphs.len(), glyph_width);

        Ok(Self { glyph_width, glyphs })
    }

    /// Load a glyph table from a file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;

        Self::parse(&source).with_context(|| format!("Failed to parse font file: {}", path.display()))
    }

    /// Characters this table can render, in table order
    pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.glyphs.len()).filter_map(|i| char::from_u32(FIRST_CODE + i as u32))
    }
}

impl GlyphSource for FontTable {
    fn glyph_width(&self) -> usize {
        self.glyph_width
    }

    fn glyph(&self, index: usize) -> Option<&Glyph> {
        self.glyphs.get(index)
    }

    fn len(&self) -> usize {
        self.glyphs.len()
    }
}
