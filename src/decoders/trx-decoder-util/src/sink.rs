// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Consumers for decoder output: decoded records and log events.
//!
//! Sinks are shared across all decoder instances and may be called from
//! several decoder threads at once, hence the `Send + Sync` bound. They own
//! presentation and delivery; the decoder side never retries.

use tracing::{event, Level as TracingLevel};

use trx_core::data::{Data, Value};

use crate::device::Device;
use crate::level::Level;
use crate::render::Bits;

/// Receives completed decode results.
pub trait DataSink: Send + Sync {
    fn output_data(&self, decoder: &Device, data: Data);
}

/// Receives decoder log events that passed the decoder's level filter.
pub trait LogSink: Send + Sync {
    fn output_log(&self, decoder: &Device, event: &LogEvent<'_>);
}

impl<F> DataSink for F
where
    F: Fn(&Device, Data) + Send + Sync,
{
    fn output_data(&self, decoder: &Device, data: Data) {
        self(decoder, data)
    }
}

impl<F> LogSink for F
where
    F: Fn(&Device, &LogEvent<'_>) + Send + Sync,
{
    fn output_log(&self, decoder: &Device, event: &LogEvent<'_>) {
        self(decoder, event)
    }
}

/// A composed log event. Lives for the duration of one log call.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub level: Level,
    /// Originating function.
    pub src: &'a str,
    pub msg: &'a str,
    pub bits: Option<Bits<'a>>,
    /// Pre-built record passed through `decoder_output_log`.
    pub data: Option<&'a Data>,
}

impl<'a> LogEvent<'a> {
    pub fn new(level: Level, src: &'a str, msg: &'a str) -> Self {
        Self {
            level,
            src,
            msg,
            bits: None,
            data: None,
        }
    }

    pub fn with_bits(mut self, bits: Bits<'a>) -> Self {
        self.bits = Some(bits);
        self
    }

    /// Structured form: `src`, `lvl`, `msg`, then `num_rows` and the
    /// `codes` list when bits are attached, then any passed-through record fields.
    pub fn to_data(&self) -> Data {
        let mut data = Data::new()
            .with("src", "", self.src)
            .with("lvl", "", i64::from(self.level.value()))
            .with("msg", "", self.msg);
        // Rows and buffers share the `codes` list form.
        if let Some(bits) = self.bits {
            data.push("num_rows", "", bits.num_rows() as i64);
            let codes = bits.codes().map(|c| Value::String(c.to_string())).collect();
            data.push("codes", "", Value::Array(codes));
        }
        if let Some(extra) = self.data {
            for field in extra.fields() {
                data.push(&field.key, &field.pretty, field.value.clone());
            }
        }
        data
    }
}

/// Forwards decoder log events into the process `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

macro_rules! forward_event {
    ($lvl:expr, $name:ident, $ev:ident) => {
        match $ev.bits {
            Some(bits) => event!($lvl, decoder = %$name, src = %$ev.src, bits = %bits, "{}", $ev.msg),
            None => event!($lvl, decoder = %$name, src = %$ev.src, "{}", $ev.msg),
        }
    };
}

impl LogSink for TracingLogSink {
    fn output_log(&self, decoder: &Device, ev: &LogEvent<'_>) {
        let name = decoder.name();
        // `event!` needs a constant level.
        match ev.level.to_tracing() {
            TracingLevel::ERROR => forward_event!(TracingLevel::ERROR, name, ev),
            TracingLevel::WARN => forward_event!(TracingLevel::WARN, name, ev),
            TracingLevel::INFO => forward_event!(TracingLevel::INFO, name, ev),
            TracingLevel::DEBUG => forward_event!(TracingLevel::DEBUG, name, ev),
            _ => forward_event!(TracingLevel::TRACE, name, ev),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trx_core::bitbuffer::{BitBuffer, BitRow};

    #[test]
    fn plain_event_as_data() {
        let ev = LogEvent::new(Level::Debug, "acurite_decode", "bad checksum");
        let json = serde_json::to_string(&ev.to_data()).unwrap();
        assert_eq!(
            json,
            r#"{"src":"acurite_decode","lvl":7,"msg":"bad checksum"}"#
        );
    }

    #[test]
    fn bitbuffer_event_as_data() {
        let bb = BitBuffer::parse("{8}aa/{4}b").unwrap();
        let ev = LogEvent::new(Level::Info, "f", "rows").with_bits(Bits::Buffer(&bb));
        let json = serde_json::to_value(ev.to_data()).unwrap();
        assert_eq!(json["num_rows"], 2);
        assert_eq!(json["codes"], serde_json::json!(["{8}aa", "{4}b"]));
    }

    #[test]
    fn bitrow_event_as_data() {
        let bytes = [0xb0];
        let ev = LogEvent::new(Level::Info, "f", "").with_bits(Bits::Row(BitRow::new(&bytes, 4)));
        let json = serde_json::to_value(ev.to_data()).unwrap();
        assert_eq!(json["num_rows"], 1);
        assert_eq!(json["codes"], serde_json::json!(["{4}b"]));
        assert_eq!(json["msg"], "");
    }

    #[test]
    fn closures_are_sinks() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        let seen = AtomicUsize::new(0);
        let sink = |_: &Device, data: Data| {
            seen.fetch_add(data.len(), Ordering::Relaxed);
        };
        sink.output_data(&Device::default(), Data::new().with("a", "", 1).with("b", "", 2));
        assert_eq!(seen.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn tracing_sink_accepts_every_level() {
        let dev = Device::template("t", &[]);
        let bytes = [0xff];
        for level in Level::ALL {
            let ev = LogEvent::new(level, "f", "m").with_bits(Bits::Row(BitRow::new(&bytes, 8)));
            TracingLogSink.output_log(&dev, &ev);
            TracingLogSink.output_log(&dev, &LogEvent::new(level, "f", "m"));
        }
    }
}
