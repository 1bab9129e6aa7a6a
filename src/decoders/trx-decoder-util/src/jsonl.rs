// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! JSON-Lines consumer for decoded records and decoder log events.

use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::json;
use tracing::warn;

use trx_core::data::Data;

use crate::device::Device;
use crate::sink::{DataSink, LogEvent, LogSink};

/// Writes one JSON object per record or event:
/// `{"ts_ms":…,"kind":"data"|"log","decoder":…,"protocol":…,"payload":{…}}`.
///
/// Write failures are reported through `tracing` and otherwise ignored.
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line<T: Serialize>(&self, kind: &str, decoder: &Device, payload: &T) {
        let ts_ms = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as u64,
            Err(_) => 0,
        };
        let line = json!({
            "ts_ms": ts_ms,
            "kind": kind,
            "decoder": decoder.name(),
            "protocol": decoder.protocol_num(),
            "payload": payload,
        });
        let Ok(mut writer) = self.writer.lock() else {
            warn!("json output mutex poisoned for {}", decoder.name());
            return;
        };
        if serde_json::to_writer(&mut *writer, &line).is_err() {
            warn!("json output serialization failed for {}", decoder.name());
            return;
        }
        if writer.write_all(b"\n").is_err() {
            warn!("json output write failed for {}", decoder.name());
            return;
        }
        let _ = writer.flush();
    }
}

impl<W: Write + Send> DataSink for JsonLinesSink<W> {
    fn output_data(&self, decoder: &Device, data: Data) {
        self.write_line("data", decoder, &data);
    }
}

impl<W: Write + Send> LogSink for JsonLinesSink<W> {
    fn output_log(&self, decoder: &Device, event: &LogEvent<'_>) {
        self.write_line("log", decoder, &event.to_data());
    }
}
