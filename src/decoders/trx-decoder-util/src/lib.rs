// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoder-side output helpers: decoder descriptors, decoded record output
//! and level-filtered decoder logging.
//!
//! With the `decoder-log` feature (default) the `decoder_log*` macros route
//! events through the decoder's [`LogSink`]. Without it the same macros
//! expand to nothing that runs and keep no message text in the binary.

pub mod config;
pub mod device;
pub mod jsonl;
pub mod level;
pub mod output;
pub mod registry;
pub mod render;
pub mod sink;

#[cfg(feature = "decoder-log")]
mod log;
#[cfg(not(feature = "decoder-log"))]
mod log_elided;

pub use config::{ConfigError, DecoderConfig};
pub use device::{create_device, CreateDeviceError, DecoderContext, Device};
pub use jsonl::JsonLinesSink;
pub use level::Level;
pub use output::{decoder_output_data, decoder_output_log};
pub use registry::DeviceRegistry;
pub use render::{Bits, BufferCodes, RowBits, RowCode};
pub use sink::{DataSink, LogEvent, LogSink, TracingLogSink};
pub use trx_core::bitbuffer::{BitBuffer, BitRow};
pub use trx_core::data::{Data, Value};

#[cfg(feature = "decoder-log")]
pub use log::{
    decoder_log, decoder_log_bitbuffer, decoder_log_bitrow, decoder_logf, decoder_logf_bitbuffer,
    decoder_logf_bitrow, DECODER_LOG_MSG_MAX,
};
