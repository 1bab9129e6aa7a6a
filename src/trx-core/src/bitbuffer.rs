// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Bit rows and bit buffers as produced by the pulse slicers.
//!
//! A [`BitBuffer`] holds up to [`BITBUF_ROWS`] rows of up to [`BITBUF_COLS`]
//! bytes each. Bits are packed MSB first. Decoders only ever see borrowed
//! [`BitRow`] views.

use std::fmt;

use thiserror::Error;

/// Maximum number of bytes per row.
pub const BITBUF_COLS: usize = 128;
/// Maximum number of rows.
pub const BITBUF_ROWS: usize = 50;
/// Maximum number of bits per row.
pub const BITBUF_MAX_ROW_BITS: usize = BITBUF_COLS * 8;

/// Borrowed view of one row: a byte slice plus its bit length.
///
/// The bit length is clamped to what the slice can hold, so a view never
/// claims bits past the end of its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitRow<'a> {
    bytes: &'a [u8],
    bit_len: usize,
}

impl<'a> BitRow<'a> {
    pub fn new(bytes: &'a [u8], bit_len: usize) -> Self {
        Self {
            bytes,
            bit_len: bit_len.min(bytes.len() * 8),
        }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Bit at `index`, MSB first. `None` past the declared length.
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }
}

#[derive(Clone)]
struct RowStorage {
    bytes: [u8; BITBUF_COLS],
    bit_len: usize,
}

impl RowStorage {
    const fn empty() -> Self {
        Self {
            bytes: [0; BITBUF_COLS],
            bit_len: 0,
        }
    }
}

/// Errors from [`BitBuffer::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid hex digit '{0}' in row code")]
    InvalidDigit(char),
    #[error("unterminated bit length prefix")]
    UnterminatedLength,
    #[error("invalid bit length '{0}'")]
    InvalidLength(String),
    #[error("row of {0} bits exceeds the row capacity")]
    RowTooLong(usize),
    #[error("too many rows")]
    TooManyRows,
}

/// An ordered set of bit rows, e.g. repeated transmissions of one payload.
#[derive(Clone)]
pub struct BitBuffer {
    rows: Vec<RowStorage>,
}

impl Default for BitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BitBuffer {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn row(&self, index: usize) -> Option<BitRow<'_>> {
        self.rows
            .get(index)
            .map(|r| BitRow::new(&r.bytes, r.bit_len))
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = BitRow<'_>> + '_ {
        self.rows.iter().map(|r| BitRow::new(&r.bytes, r.bit_len))
    }

    /// Start a new empty row. Returns `false` once the row limit is reached.
    pub fn add_row(&mut self) -> bool {
        if self.rows.len() >= BITBUF_ROWS {
            return false;
        }
        self.rows.push(RowStorage::empty());
        true
    }

    /// Append a bit to the last row, starting the first row if needed.
    /// Bits beyond the row capacity are dropped.
    pub fn add_bit(&mut self, bit: bool) {
        if self.rows.is_empty() && !self.add_row() {
            return;
        }
        let Some(row) = self.rows.last_mut() else {
            return;
        };
        if row.bit_len >= BITBUF_MAX_ROW_BITS {
            return;
        }
        if bit {
            row.bytes[row.bit_len / 8] |= 0x80 >> (row.bit_len % 8);
        }
        row.bit_len += 1;
    }

    /// Append a complete row. Bytes and bits beyond the row capacity are
    /// dropped. Returns `false` once the row limit is reached.
    pub fn push_row(&mut self, bytes: &[u8], bit_len: usize) -> bool {
        if !self.add_row() {
            return false;
        }
        let bit_len = bit_len.min(bytes.len() * 8).min(BITBUF_MAX_ROW_BITS);
        let n = bit_len.div_ceil(8);
        if let Some(row) = self.rows.last_mut() {
            row.bytes[..n].copy_from_slice(&bytes[..n]);
            row.bit_len = bit_len;
        }
        true
    }

    /// Parse row codes such as `{25}fb2dd58` or `{8}ff/{4}a`.
    ///
    /// A row without a `{N}` prefix takes four bits per hex digit. Rows are
    /// separated by `/` or by a new `{N}` prefix. Whitespace is ignored.
    pub fn parse(code: &str) -> Result<Self, ParseError> {
        let mut bitbuffer = Self::new();
        let mut chars = code.chars().filter(|c| !c.is_whitespace());
        let mut pending: Option<(Option<usize>, Vec<u8>, usize)> = None;

        let finish = |bitbuffer: &mut Self,
                      row: Option<(Option<usize>, Vec<u8>, usize)>|
         -> Result<(), ParseError> {
            let Some((declared, bytes, nibbles)) = row else {
                return Ok(());
            };
            let bit_len = declared.unwrap_or(nibbles * 4);
            if bit_len > BITBUF_MAX_ROW_BITS {
                return Err(ParseError::RowTooLong(bit_len));
            }
            if !bitbuffer.push_row(&bytes, bit_len) {
                return Err(ParseError::TooManyRows);
            }
            Ok(())
        };

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    finish(&mut bitbuffer, pending.take())?;
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(d) => digits.push(d),
                            None => return Err(ParseError::UnterminatedLength),
                        }
                    }
                    let bits = digits
                        .parse::<usize>()
                        .map_err(|_| ParseError::InvalidLength(digits.clone()))?;
                    pending = Some((Some(bits), Vec::new(), 0));
                }
                '/' => {
                    finish(&mut bitbuffer, pending.take())?;
                }
                _ => {
                    let nibble = c.to_digit(16).ok_or(ParseError::InvalidDigit(c))? as u8;
                    let (_, bytes, nibbles) = pending.get_or_insert_with(|| (None, Vec::new(), 0));
                    if *nibbles % 2 == 0 {
                        bytes.push(nibble << 4);
                    } else if let Some(last) = bytes.last_mut() {
                        *last |= nibble;
                    }
                    *nibbles += 1;
                }
            }
        }
        finish(&mut bitbuffer, pending.take())?;
        Ok(bitbuffer)
    }
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows().map(|r| (r.bit_len(), &r.bytes()[..r.bit_len().div_ceil(8)])))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_row_clamps_length_to_bytes() {
        let bytes = [0xff];
        let row = BitRow::new(&bytes, 20);
        assert_eq!(row.bit_len(), 8);
        assert_eq!(row.bit(7), Some(true));
        assert_eq!(row.bit(8), None);
    }

    #[test]
    fn add_bit_packs_msb_first() {
        let mut bb = BitBuffer::new();
        for bit in [true, false, true, true] {
            bb.add_bit(bit);
        }
        let row = bb.row(0).unwrap();
        assert_eq!(row.bit_len(), 4);
        assert_eq!(row.bytes()[0], 0b1011_0000);
    }

    #[test]
    fn add_row_stops_at_limit() {
        let mut bb = BitBuffer::new();
        for _ in 0..BITBUF_ROWS {
            assert!(bb.add_row());
        }
        assert!(!bb.add_row());
        assert!(!bb.push_row(&[0xaa], 8));
        assert_eq!(bb.num_rows(), BITBUF_ROWS);
    }

    #[test]
    fn parse_rows_with_and_without_prefix() {
        let bb = BitBuffer::parse("{25}fb2dd58 / abc {4}b").unwrap();
        assert_eq!(bb.num_rows(), 3);
        let r0 = bb.row(0).unwrap();
        assert_eq!(r0.bit_len(), 25);
        assert_eq!(&r0.bytes()[..4], &[0xfb, 0x2d, 0xd5, 0x80]);
        let r1 = bb.row(1).unwrap();
        assert_eq!(r1.bit_len(), 12);
        assert_eq!(&r1.bytes()[..2], &[0xab, 0xc0]);
        assert_eq!(bb.row(2).unwrap().bytes()[0], 0xb0);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            BitBuffer::parse("{8}fg").unwrap_err(),
            ParseError::InvalidDigit('g')
        );
        assert_eq!(
            BitBuffer::parse("{12").unwrap_err(),
            ParseError::UnterminatedLength
        );
        assert!(matches!(
            BitBuffer::parse("{x}ff").unwrap_err(),
            ParseError::InvalidLength(_)
        ));
        assert_eq!(
            BitBuffer::parse("{2000}ff").unwrap_err(),
            ParseError::RowTooLong(2000)
        );
    }
}
