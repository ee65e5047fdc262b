//! Wire encoding
//!
//! The board expects one byte per 8 columns, rows top to bottom, byte
//! groups left to right. Within a byte, bit 0 (LSB) is the leftmost column
//! of the group. The firmware reverses byte and bit order itself to match
//! the shift registers, so this order must not change.

use crate::error::{Error, Result};
use crate::frame::{Frame, COLS, ROWS};

/// Bytes in one encoded device frame
pub const FRAME_BYTES: usize = ROWS * COLS / 8;

/// Serialized frame, ready for the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame(Vec<u8>);

impl EncodedFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for EncodedFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Pack a frame into wire bytes
///
/// The frame width must be a multiple of 8.
pub fn encode(frame: &Frame) -> Result<EncodedFrame> {
    if frame.width() % 8 != 0 {
        return Err(Error::InvalidGeometry(format!(
            "width {} is not a multiple of 8",
            frame.width()
        )));
    }

    let mut out = Vec::with_capacity(ROWS * frame.width() / 8);
    for row in frame.rows() {
        for group in row.chunks_exact(8) {
            let byte = group
                .iter()
                .enumerate()
                .fold(0u8, |acc, (bit, &lit)| acc | (u8::from(lit) << bit));
            out.push(byte);
        }
    }

    Ok(EncodedFrame(out))
}

/// Unpack wire bytes back into a frame `width` columns wide
pub fn decode(bytes: &[u8], width: usize) -> Result<Frame> {
    if width % 8 != 0 || bytes.len() != ROWS * width / 8 {
        return Err(Error::InvalidGeometry(format!(
            "{} bytes cannot hold {} rows of {} columns",
            bytes.len(),
            ROWS,
            width
        )));
    }

    let bytes_per_row = width / 8;
    Ok(Frame::from_fn(width, |row, col| {
        let byte = bytes[row * bytes_per_row + col / 8];
        byte & (1 << (col % 8)) != 0
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_order() {
        // Only the leftmost column of row 0 lit
        let frame = Frame::from_fn(COLS, |row, col| row == 0 && col == 0);
        let enc = encode(&frame).unwrap();
        assert_eq!(enc.len(), FRAME_BYTES);
        assert_eq!(enc.as_bytes()[0], 0x01);
        assert!(enc.as_bytes()[1..].iter().all(|&b| b == 0));

        // Column 7 of the first group, column 8 starts the next byte
        let frame = Frame::from_fn(COLS, |row, col| row == 0 && (col == 7 || col == 8));
        let enc = encode(&frame).unwrap();
        assert_eq!(&enc.as_bytes()[0..2], &[0x80, 0x01]);

        // Rows are laid out top to bottom, 8 bytes each
        let frame = Frame::from_fn(COLS, |row, col| row == 1 && col == 63);
        let enc = encode(&frame).unwrap();
        assert_eq!(enc.as_bytes()[15], 0x80);
        assert_eq!(enc.as_bytes().iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn test_all_on() {
        let enc = encode(&Frame::lit(COLS)).unwrap();
        assert_eq!(enc.into_bytes(), vec![0xff; FRAME_BYTES]);
    }

    #[test]
    fn test_rejects_unaligned_width() {
        assert!(matches!(encode(&Frame::blank(12)), Err(Error::InvalidGeometry(_))));
        assert!(matches!(decode(&[0; 47], COLS), Err(Error::InvalidGeometry(_))));
        assert!(matches!(decode(&[0; 6], 7), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let patterns = [
            Frame::from_fn(COLS, |row, col| (row * 7 + col * 3) % 5 == 0),
            Frame::from_fn(80, |row, col| (col ^ row) & 1 == 1),
            Frame::from_fn(16, |row, col| row == col),
        ];
        for frame in &patterns {
            let enc = encode(frame).unwrap();
            assert_eq!(&decode(enc.as_bytes(), frame.width()).unwrap(), frame);
        }
    }
}
