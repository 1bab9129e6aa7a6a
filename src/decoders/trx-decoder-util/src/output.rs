// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Handing decode results and raw log records to the decoder's consumers.

use trx_core::data::Data;

use crate::device::Device;
use crate::level::Level;
use crate::sink::LogEvent;

/// Output a decoded record.
///
/// The record is consumed. A decoder without a data sink is a wiring bug:
/// debug builds assert, release builds drop the record.
pub fn decoder_output_data(decoder: &Device, data: Data) {
    debug_assert!(
        decoder.output_sink().is_some(),
        "decoder '{}' has no data sink",
        decoder.name()
    );
    let Some(sink) = decoder.output_sink() else {
        return;
    };
    sink.output_data(decoder, data);
}

/// Output a pre-built log record at `level`, subject to the decoder's
/// level filter.
pub fn decoder_output_log(decoder: &Device, level: Level, data: &Data) {
    if !decoder.log_enabled(level) {
        return;
    }
    let event = LogEvent {
        data: Some(data),
        ..LogEvent::new(level, "", "")
    };
    forward(decoder, &event);
}

/// Deliver an already filtered event to the decoder's log sink.
pub(crate) fn forward(decoder: &Device, event: &LogEvent<'_>) {
    debug_assert!(
        decoder.log_sink().is_some(),
        "decoder '{}' has no log sink",
        decoder.name()
    );
    let Some(sink) = decoder.log_sink() else {
        return;
    };
    sink.output_log(decoder, event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use trx_core::data::Value;

    use crate::device::create_device;
    use crate::sink::{DataSink, LogSink};

    #[test]
    fn data_reaches_sink_with_decoder_identity() {
        let seen: Arc<Mutex<Vec<(String, Data)>>> = Arc::default();
        let captured = seen.clone();
        let sink: Arc<dyn DataSink> = Arc::new(move |dev: &Device, data: Data| {
            captured.lock().unwrap().push((dev.name().to_string(), data));
        });

        let mut dev = create_device(Some(&Device::template("FoobarCorp-XY3000", &["model"]))).unwrap();
        dev.set_output_sink(Some(sink));
        decoder_output_data(&dev, Data::new().with("model", "", "XY3000").with("id", "", 5));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "FoobarCorp-XY3000");
        assert_eq!(seen[0].1.get("id"), Some(&Value::Int(5)));
    }

    #[test]
    fn raw_log_record_is_filtered() {
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();
        let captured = seen.clone();
        let sink: Arc<dyn LogSink> = Arc::new(move |_: &Device, ev: &LogEvent<'_>| {
            let json = serde_json::to_string(&ev.to_data()).unwrap();
            captured.lock().unwrap().push(json);
        });

        let mut dev = create_device(None).unwrap();
        dev.set_log_sink(Some(sink));
        let record = Data::new().with("note", "", "raw");
        decoder_output_log(&dev, Level::Info, &record);
        decoder_output_log(&dev, Level::Error, &record);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], r#"{"src":"","lvl":3,"msg":"","note":"raw"}"#);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no data sink")]
    fn missing_data_sink_asserts_in_debug() {
        decoder_output_data(&Device::template("orphan", &[]), Data::new());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "has no log sink")]
    fn missing_log_sink_asserts_in_debug() {
        decoder_output_log(&Device::template("orphan", &[]), Level::Fatal, &Data::new());
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn missing_sinks_are_dropped_in_release() {
        let dev = Device::template("orphan", &[]);
        decoder_output_data(&dev, Data::new());
        decoder_output_log(&dev, Level::Fatal, &Data::new());
    }
}
