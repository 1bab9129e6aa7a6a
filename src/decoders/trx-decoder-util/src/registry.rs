// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Registry of active decoder instances.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{normalize_name, DecoderConfig};
use crate::device::{create_device, CreateDeviceError, Device};
use crate::sink::{DataSink, LogSink};

/// Owns the decoder instances created from protocol templates and wires
/// them to the shared output consumers.
pub struct DeviceRegistry {
    config: DecoderConfig,
    data_sink: Arc<dyn DataSink>,
    log_sink: Arc<dyn LogSink>,
    devices: Vec<Device>,
    next_protocol_num: u32,
}

impl DeviceRegistry {
    pub fn new(
        config: DecoderConfig,
        data_sink: Arc<dyn DataSink>,
        log_sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            config,
            data_sink,
            log_sink,
            devices: Vec::new(),
            next_protocol_num: 1,
        }
    }

    /// Instantiate a decoder from `template`.
    ///
    /// The instance gets the next protocol number, the configured threshold
    /// for its name and the registry's sinks. The template is not modified.
    pub fn register(&mut self, template: &Device) -> Result<&mut Device, CreateDeviceError> {
        let mut device = create_device(Some(template))?;
        device.set_protocol_num(self.next_protocol_num);
        device.set_verbose(self.config.verbosity_for(template.name()));
        device.set_output_sink(Some(self.data_sink.clone()));
        device.set_log_sink(Some(self.log_sink.clone()));
        self.next_protocol_num += 1;

        debug!(
            "Registered decoder [{}] {} (verbosity {})",
            device.protocol_num(),
            device.name(),
            device.verbose()
        );
        self.devices.push(device);
        let idx = self.devices.len() - 1;
        Ok(&mut self.devices[idx])
    }

    /// Drop the decoder with `protocol_num`. Returns whether it existed.
    pub fn unregister(&mut self, protocol_num: u32) -> bool {
        let Some(idx) = self
            .devices
            .iter()
            .position(|d| d.protocol_num() == protocol_num)
        else {
            return false;
        };
        let device = self.devices.remove(idx);
        info!("Unregistered decoder [{}] {}", protocol_num, device.name());
        true
    }

    /// Look up a decoder by name, ignoring case and punctuation.
    pub fn find(&self, name: &str) -> Option<&Device> {
        let wanted = normalize_name(name);
        self.devices
            .iter()
            .find(|d| normalize_name(d.name()) == wanted)
    }

    pub fn get(&self, protocol_num: u32) -> Option<&Device> {
        self.devices
            .iter()
            .find(|d| d.protocol_num() == protocol_num)
    }

    /// Enabled decoders in registration order.
    pub fn enabled(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| !d.is_disabled())
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}
