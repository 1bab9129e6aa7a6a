// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Demo protocol decoders fed from bit row codes.

use std::sync::Arc;

use trx_decoder_util::{
    decoder_log, decoder_log_bitbuffer, decoder_logf, decoder_logf_bitrow, decoder_output_data,
    BitBuffer, Data, Device, Level, RowCode, Value,
};

/// Decode callback: returns the number of records emitted.
pub type DecodeFn = fn(&Device, &BitBuffer) -> usize;

/// Per-instance parameters for the XY3000 decoder.
#[derive(Debug, Clone, Copy)]
pub struct Xy3000Params {
    pub type_code: u8,
}

/// Protocol templates with their decode callbacks, in registration order.
pub fn protocols() -> Vec<(Device, DecodeFn)> {
    let mut xy3000 = Device::template("FoobarCorp-XY3000", &["model", "id", "mic"]);
    xy3000.set_context(Some(Arc::new(Xy3000Params { type_code: 0x5a })));

    let raw = Device::template("Raw-Rows", &["model", "num_rows", "codes"]);

    vec![
        (xy3000, xy3000_decode as DecodeFn),
        (raw, raw_decode as DecodeFn),
    ]
}

/// 24-bit rows: id, type code, additive checksum.
pub fn xy3000_decode(decoder: &Device, bitbuffer: &BitBuffer) -> usize {
    decoder_log_bitbuffer!(decoder, Level::Debug, "xy3000_decode", bitbuffer, "");

    let Some(params) = decoder.context_as::<Xy3000Params>().copied() else {
        decoder_log!(decoder, Level::Error, "xy3000_decode", "missing decoder context");
        return 0;
    };

    let mut events = 0;
    for row in bitbuffer.rows() {
        if row.bit_len() != 24 {
            decoder_logf!(
                decoder,
                Level::Trace,
                "xy3000_decode",
                "skipping row of {} bits",
                row.bit_len()
            );
            continue;
        }
        let b = row.bytes();
        if b[1] != params.type_code {
            decoder_logf!(
                decoder,
                Level::Info,
                "xy3000_decode",
                "FoobarCorp-XY3000: unexpected type code {:02x}",
                b[1]
            );
            continue;
        }
        let sum = b[0].wrapping_add(b[1]);
        if sum != b[2] {
            decoder_logf_bitrow!(
                decoder,
                Level::Info,
                "xy3000_decode",
                b,
                row.bit_len(),
                "checksum mismatch, expected {:02x}",
                sum
            );
            continue;
        }

        let data = Data::new()
            .with("model", "", "FoobarCorp-XY3000")
            .with("id", "ID", i64::from(b[0]))
            .with("mic", "Integrity", "CHECKSUM");
        decoder_output_data(decoder, data);
        events += 1;
    }
    events
}

/// Emits every non-empty buffer as a list of row codes.
pub fn raw_decode(decoder: &Device, bitbuffer: &BitBuffer) -> usize {
    if bitbuffer.is_empty() {
        decoder_log!(decoder, Level::Notice, "raw_decode", "empty bit buffer");
        return 0;
    }
    let codes = bitbuffer
        .rows()
        .map(|row| Value::String(RowCode(row).to_string()))
        .collect();
    let data = Data::new()
        .with("model", "", "Raw-Rows")
        .with("num_rows", "Rows", bitbuffer.num_rows() as i64)
        .with("codes", "Codes", Value::Array(codes));
    decoder_output_data(decoder, data);
    1
}
