// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoder log entry points (`decoder-log` feature enabled).
//!
//! Six entry points share one filter: plain and formatted messages, each
//! optionally followed by a bit buffer or a single bit row. The macros test
//! the decoder's threshold before evaluating the message, format arguments
//! or bits, so a filtered call costs one comparison. The functions re-check
//! the threshold and can be called directly with pre-built
//! [`fmt::Arguments`].
//!
//! Keep messages terse: formatted messages are composed into a
//! [`DECODER_LOG_MSG_MAX`] byte stack buffer and truncated past that,
//! e.g. `"FoobarCorp-XY3000: unexpected type code %02x"`.

use std::fmt::{self, Write as _};

use trx_core::bitbuffer::{BitBuffer, BitRow};

use crate::device::Device;
use crate::level::Level;
use crate::output::forward;
use crate::render::Bits;
use crate::sink::LogEvent;

/// Capacity of the formatted message buffer in bytes.
pub const DECODER_LOG_MSG_MAX: usize = 60;

/// Fixed-capacity message buffer; silently truncates on a char boundary.
struct MsgBuf {
    buf: [u8; DECODER_LOG_MSG_MAX],
    len: usize,
}

impl MsgBuf {
    fn new() -> Self {
        Self {
            buf: [0; DECODER_LOG_MSG_MAX],
            len: 0,
        }
    }

    fn format(args: fmt::Arguments<'_>) -> Self {
        let mut buf = Self::new();
        // Only fails on truncation, which is the intended behavior.
        let _ = buf.write_fmt(args);
        buf
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }
}

impl fmt::Write for MsgBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = DECODER_LOG_MSG_MAX - self.len;
        if s.len() <= room {
            self.buf[self.len..self.len + s.len()].copy_from_slice(s.as_bytes());
            self.len += s.len();
            return Ok(());
        }
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.buf[self.len..self.len + cut].copy_from_slice(&s.as_bytes()[..cut]);
        self.len += cut;
        Err(fmt::Error)
    }
}

fn emit(decoder: &Device, level: Level, func: &str, msg: &str, bits: Option<Bits<'_>>) {
    let mut event = LogEvent::new(level, func, msg);
    event.bits = bits;
    forward(decoder, &event);
}

/// Output a log message.
pub fn decoder_log(decoder: &Device, level: Level, func: &str, msg: &str) {
    if !decoder.log_enabled(level) {
        return;
    }
    emit(decoder, level, func, msg, None);
}

/// Output a formatted log message.
pub fn decoder_logf(decoder: &Device, level: Level, func: &str, args: fmt::Arguments<'_>) {
    if !decoder.log_enabled(level) {
        return;
    }
    let msg = MsgBuf::format(args);
    emit(decoder, level, func, msg.as_str(), None);
}

/// Output a log message with the content of the bit buffer.
pub fn decoder_log_bitbuffer(
    decoder: &Device,
    level: Level,
    func: &str,
    bitbuffer: &BitBuffer,
    msg: &str,
) {
    if !decoder.log_enabled(level) {
        return;
    }
    emit(decoder, level, func, msg, Some(Bits::Buffer(bitbuffer)));
}

/// Output a formatted log message with the content of the bit buffer.
pub fn decoder_logf_bitbuffer(
    decoder: &Device,
    level: Level,
    func: &str,
    bitbuffer: &BitBuffer,
    args: fmt::Arguments<'_>,
) {
    if !decoder.log_enabled(level) {
        return;
    }
    let msg = MsgBuf::format(args);
    emit(decoder, level, func, msg.as_str(), Some(Bits::Buffer(bitbuffer)));
}

/// Output a log message with the content of a bit row.
pub fn decoder_log_bitrow(
    decoder: &Device,
    level: Level,
    func: &str,
    bitrow: &[u8],
    bit_len: usize,
    msg: &str,
) {
    if !decoder.log_enabled(level) {
        return;
    }
    let row = BitRow::new(bitrow, bit_len);
    emit(decoder, level, func, msg, Some(Bits::Row(row)));
}

/// Output a formatted log message with the content of a bit row.
pub fn decoder_logf_bitrow(
    decoder: &Device,
    level: Level,
    func: &str,
    bitrow: &[u8],
    bit_len: usize,
    args: fmt::Arguments<'_>,
) {
    if !decoder.log_enabled(level) {
        return;
    }
    let msg = MsgBuf::format(args);
    let row = BitRow::new(bitrow, bit_len);
    emit(decoder, level, func, msg.as_str(), Some(Bits::Row(row)));
}

/// Log a message if `level` passes the decoder's threshold.
///
/// ```ignore
/// decoder_log!(decoder, Level::Debug, "acurite_decode", "bad checksum");
/// ```
#[macro_export]
macro_rules! decoder_log {
    ($decoder:expr, $level:expr, $func:expr, $msg:expr $(,)?) => {{
        let decoder: &$crate::Device = &$decoder;
        let level: $crate::Level = $level;
        if decoder.log_enabled(level) {
            $crate::decoder_log(decoder, level, $func, $msg);
        }
    }};
}

/// Log a formatted message. Arguments are positional and are only
/// evaluated when the level passes.
///
/// ```ignore
/// decoder_logf!(decoder, Level::Debug, "xy3000_decode", "unexpected type code {:02x}", b[0]);
/// ```
#[macro_export]
macro_rules! decoder_logf {
    ($decoder:expr, $level:expr, $func:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let decoder: &$crate::Device = &$decoder;
        let level: $crate::Level = $level;
        if decoder.log_enabled(level) {
            $crate::decoder_logf(decoder, level, $func, ::std::format_args!($fmt $(, $arg)*));
        }
    }};
}

/// Log a message followed by every row of a bit buffer.
#[macro_export]
macro_rules! decoder_log_bitbuffer {
    ($decoder:expr, $level:expr, $func:expr, $bitbuffer:expr, $msg:expr $(,)?) => {{
        let decoder: &$crate::Device = &$decoder;
        let level: $crate::Level = $level;
        if decoder.log_enabled(level) {
            $crate::decoder_log_bitbuffer(decoder, level, $func, &$bitbuffer, $msg);
        }
    }};
}

/// Log a formatted message followed by every row of a bit buffer.
#[macro_export]
macro_rules! decoder_logf_bitbuffer {
    ($decoder:expr, $level:expr, $func:expr, $bitbuffer:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let decoder: &$crate::Device = &$decoder;
        let level: $crate::Level = $level;
        if decoder.log_enabled(level) {
            $crate::decoder_logf_bitbuffer(
                decoder,
                level,
                $func,
                &$bitbuffer,
                ::std::format_args!($fmt $(, $arg)*),
            );
        }
    }};
}

/// Log a message followed by one bit row (`bytes`, `bit_len`).
#[macro_export]
macro_rules! decoder_log_bitrow {
    ($decoder:expr, $level:expr, $func:expr, $bitrow:expr, $bit_len:expr, $msg:expr $(,)?) => {{
        let decoder: &$crate::Device = &$decoder;
        let level: $crate::Level = $level;
        if decoder.log_enabled(level) {
            $crate::decoder_log_bitrow(decoder, level, $func, &$bitrow, $bit_len, $msg);
        }
    }};
}

/// Log a formatted message followed by one bit row (`bytes`, `bit_len`).
#[macro_export]
macro_rules! decoder_logf_bitrow {
    ($decoder:expr, $level:expr, $func:expr, $bitrow:expr, $bit_len:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let decoder: &$crate::Device = &$decoder;
        let level: $crate::Level = $level;
        if decoder.log_enabled(level) {
            $crate::decoder_logf_bitrow(
                decoder,
                level,
                $func,
                &$bitrow,
                $bit_len,
                ::std::format_args!($fmt $(, $arg)*),
            );
        }
    }};
}
