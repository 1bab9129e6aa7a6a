// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoder log entry points with the `decoder-log` feature disabled.
//!
//! Same macro names and arguments as the logging build, and the same
//! call sites compile in both. Every argument, message expressions and
//! format strings included, is type-checked inside a branch that never
//! runs, so nothing is evaluated and no bits are rendered. String literal
//! messages are dropped from the expansion.

#[macro_export]
macro_rules! decoder_log {
    ($decoder:expr, $level:expr, $func:expr, $msg:literal $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
        }
    }};
    ($decoder:expr, $level:expr, $func:expr, $msg:expr $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _: &str = $msg;
        }
    }};
}

#[macro_export]
macro_rules! decoder_logf {
    ($decoder:expr, $level:expr, $func:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _ = ::core::format_args!($fmt $(, $arg)*);
        }
    }};
}

#[macro_export]
macro_rules! decoder_log_bitbuffer {
    ($decoder:expr, $level:expr, $func:expr, $bitbuffer:expr, $msg:literal $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _: &$crate::BitBuffer = &$bitbuffer;
        }
    }};
    ($decoder:expr, $level:expr, $func:expr, $bitbuffer:expr, $msg:expr $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _: &$crate::BitBuffer = &$bitbuffer;
            let _: &str = $msg;
        }
    }};
}

#[macro_export]
macro_rules! decoder_logf_bitbuffer {
    ($decoder:expr, $level:expr, $func:expr, $bitbuffer:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _: &$crate::BitBuffer = &$bitbuffer;
            let _ = ::core::format_args!($fmt $(, $arg)*);
        }
    }};
}

#[macro_export]
macro_rules! decoder_log_bitrow {
    ($decoder:expr, $level:expr, $func:expr, $bitrow:expr, $bit_len:expr, $msg:literal $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _: &[u8] = &$bitrow;
            let _: usize = $bit_len;
        }
    }};
    ($decoder:expr, $level:expr, $func:expr, $bitrow:expr, $bit_len:expr, $msg:expr $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _: &[u8] = &$bitrow;
            let _: usize = $bit_len;
            let _: &str = $msg;
        }
    }};
}

#[macro_export]
macro_rules! decoder_logf_bitrow {
    ($decoder:expr, $level:expr, $func:expr, $bitrow:expr, $bit_len:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        if false {
            let _: &$crate::Device = &$decoder;
            let _: $crate::Level = $level;
            let _: &str = $func;
            let _: &[u8] = &$bitrow;
            let _: usize = $bit_len;
            let _ = ::core::format_args!($fmt $(, $arg)*);
        }
    }};
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use trx_core::bitbuffer::BitBuffer;

    use crate::device::{create_device, Device};
    use crate::level::Level;
    use crate::sink::{LogEvent, LogSink};

    #[test]
    fn every_entry_point_is_a_no_op() {
        let forwarded = Arc::new(AtomicUsize::new(0));
        let counter = forwarded.clone();
        let sink: Arc<dyn LogSink> = Arc::new(move |_: &Device, _: &LogEvent<'_>| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let mut dev = create_device(None).unwrap();
        dev.set_verbose(Level::Trace);
        dev.set_log_sink(Some(sink));

        let evaluated = Cell::new(0);
        let touch = || {
            evaluated.set(evaluated.get() + 1);
            evaluated.get()
        };
        let bb = BitBuffer::parse("{8}aa").unwrap();
        let row = [0xb0u8];

        decoder_log!(dev, Level::Fatal, "f", &format!("{}", touch()));
        decoder_logf!(dev, Level::Fatal, "f", "n={}", touch());
        decoder_log_bitbuffer!(dev, Level::Fatal, "f", { touch(); &bb }, "m");
        decoder_logf_bitbuffer!(dev, Level::Fatal, "f", { touch(); &bb }, "n={}", touch());
        decoder_log_bitrow!(dev, Level::Fatal, "f", { touch(); row }, { touch(); 4 }, "m");
        decoder_logf_bitrow!(
            dev,
            Level::Fatal,
            "f",
            { touch(); row },
            { touch(); 4 },
            "n={}",
            touch()
        );

        assert_eq!(evaluated.get(), 0);
        assert_eq!(forwarded.load(Ordering::Relaxed), 0);
    }

    #[test]
    #[deny(unused_variables)]
    fn message_locals_count_as_used() {
        let dev = Device::template("FoobarCorp-XY3000", &[]);
        let bb = BitBuffer::new();
        let row = [0u8; 3];
        let reason = String::from("missing decoder context");
        let detail = String::from("bad row");
        let note = "row";
        let type_code = 0x11u8;
        let expected = 0x84u8;

        decoder_log!(dev, Level::Info, "f", &reason);
        decoder_log_bitbuffer!(dev, Level::Info, "f", bb, detail.as_str());
        decoder_log_bitrow!(dev, Level::Info, "f", row, 24, note);
        decoder_logf!(dev, Level::Info, "f", "unexpected type code {:02x}", type_code);
        decoder_logf_bitrow!(dev, Level::Info, "f", row, 24, "expected {:02x}", expected);
    }
}
