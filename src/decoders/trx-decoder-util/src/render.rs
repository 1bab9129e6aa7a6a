// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Text renderings of bit rows and bit buffers for decoder logs.
//!
//! All renderings are [`fmt::Display`] adapters over borrowed data: nothing
//! is allocated, and output is bounded by the bit buffer limits
//! ([`BITBUF_MAX_ROW_BITS`] bits per row, [`BITBUF_ROWS`] rows).

use std::fmt::{self, Write as _};

use trx_core::bitbuffer::{BitBuffer, BitRow, BITBUF_MAX_ROW_BITS, BITBUF_ROWS};

fn clamped_len(row: &BitRow<'_>) -> usize {
    row.bit_len().min(BITBUF_MAX_ROW_BITS)
}

/// Row code form `{N}hex`, e.g. `{24}abcdef`.
///
/// One hex digit per started nibble; bits of a trailing partial nibble past
/// the bit length are rendered as zero.
#[derive(Debug, Clone, Copy)]
pub struct RowCode<'a>(pub BitRow<'a>);

impl fmt::Display for RowCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit_len = clamped_len(&self.0);
        let bytes = self.0.bytes();
        write!(f, "{{{}}}", bit_len)?;
        let nibbles = bit_len.div_ceil(4);
        for i in 0..nibbles {
            let byte = bytes[i / 2];
            let mut nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            let valid = (bit_len - i * 4).min(4);
            nibble &= (0xf0u8 >> valid) & 0x0f;
            f.write_char(char::from_digit(u32::from(nibble), 16).unwrap_or('?'))?;
        }
        Ok(())
    }
}

/// Binary form, exactly one `0`/`1` per valid bit.
#[derive(Debug, Clone, Copy)]
pub struct RowBits<'a>(pub BitRow<'a>);

impl fmt::Display for RowBits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit_len = clamped_len(&self.0);
        for i in 0..bit_len {
            f.write_char(if self.0.bit(i) == Some(true) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

/// One labeled line per row: `[00] {N}hex`, in buffer order.
#[derive(Debug, Clone, Copy)]
pub struct BufferCodes<'a>(pub &'a BitBuffer);

impl fmt::Display for BufferCodes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.rows().take(BITBUF_ROWS).enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            write!(f, "[{:02}] {}", i, RowCode(row))?;
        }
        Ok(())
    }
}

/// Bits attached to a log event.
#[derive(Debug, Clone, Copy)]
pub enum Bits<'a> {
    Row(BitRow<'a>),
    Buffer(&'a BitBuffer),
}

impl<'a> Bits<'a> {
    pub fn num_rows(&self) -> usize {
        match self {
            Bits::Row(_) => 1,
            Bits::Buffer(bitbuffer) => bitbuffer.num_rows().min(BITBUF_ROWS),
        }
    }

    /// Row codes in order.
    pub fn codes(&self) -> impl Iterator<Item = RowCode<'a>> + 'a {
        let (row, buffer) = match *self {
            Bits::Row(row) => (Some(row), None),
            Bits::Buffer(bitbuffer) => (None, Some(bitbuffer)),
        };
        row.into_iter()
            .chain(buffer.into_iter().flat_map(|bb| bb.rows().take(BITBUF_ROWS)))
            .map(RowCode)
    }
}

impl fmt::Display for Bits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bits::Row(row) => fmt::Display::fmt(&RowCode(*row), f),
            Bits::Buffer(bitbuffer) => fmt::Display::fmt(&BufferCodes(bitbuffer), f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_byte_renders_only_valid_bits() {
        let bytes = [0b1011_0000];
        let row = BitRow::new(&bytes, 4);
        assert_eq!(RowBits(row).to_string(), "1011");
        assert_eq!(RowCode(row).to_string(), "{4}b");
    }

    #[test]
    fn trailing_partial_nibble_is_masked() {
        // Garbage past the declared length must not leak into the output.
        let bytes = [0xff, 0xff];
        let row = BitRow::new(&bytes, 9);
        assert_eq!(RowCode(row).to_string(), "{9}ff8");
        assert_eq!(RowBits(row).to_string(), "111111111");
    }

    #[test]
    fn declared_length_shorter_than_buffer() {
        let bytes = [0xab, 0xcd, 0xef, 0x12];
        let row = BitRow::new(&bytes, 16);
        assert_eq!(RowCode(row).to_string(), "{16}abcd");
    }

    #[test]
    fn empty_row_renders_length_only() {
        let row = BitRow::new(&[], 0);
        assert_eq!(RowCode(row).to_string(), "{0}");
        assert_eq!(RowBits(row).to_string(), "");
    }

    #[test]
    fn buffer_renders_each_row_once_in_order() {
        let mut bb = BitBuffer::new();
        bb.push_row(&[0xaa], 8);
        bb.push_row(&[0xbb, 0x80], 9);
        bb.push_row(&[0xc0], 2);
        let text = BufferCodes(&bb).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, ["[00] {8}aa", "[01] {9}bb8", "[02] {2}c"]);

        let bits = Bits::Buffer(&bb);
        assert_eq!(bits.num_rows(), 3);
        let codes: Vec<String> = bits.codes().map(|c| c.to_string()).collect();
        assert_eq!(codes, ["{8}aa", "{9}bb8", "{2}c"]);
    }

    #[test]
    fn single_row_bits() {
        let bytes = [0x12, 0x34, 0x56];
        let bits = Bits::Row(BitRow::new(&bytes, 24));
        assert_eq!(bits.num_rows(), 1);
        assert_eq!(bits.to_string(), "{24}123456");
        assert_eq!(bits.codes().count(), 1);
    }

    #[test]
    fn rendering_is_deterministic() {
        let bytes = [0x5a, 0xa5];
        let row = BitRow::new(&bytes, 12);
        assert_eq!(RowCode(row).to_string(), RowCode(row).to_string());
    }
}
