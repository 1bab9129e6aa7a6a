// SPDX-FileCopyrightText: 2026 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decoder descriptors and template instantiation.

use std::any::Any;
use std::collections::TryReserveError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::level::Level;
use crate::sink::{DataSink, LogSink};

/// Opaque per-instance context handed through to decode logic.
pub type DecoderContext = Arc<dyn Any + Send + Sync>;

/// Describes one decoder instance: identity, verbosity threshold and the
/// consumers its output is routed to.
///
/// Descriptors are cheap to clone. The context and the sinks are shared,
/// immutable capabilities; everything else is owned per instance.
#[derive(Clone, Default)]
pub struct Device {
    protocol_num: u32,
    name: String,
    verbose: Level,
    disabled: bool,
    fields: Vec<&'static str>,
    ctx: Option<DecoderContext>,
    output_sink: Option<Arc<dyn DataSink>>,
    log_sink: Option<Arc<dyn LogSink>>,
}

impl Device {
    /// A template descriptor, typically a `static`-like definition per
    /// protocol that the registry instantiates from.
    pub fn template(name: &str, fields: &[&'static str]) -> Self {
        Self {
            name: name.to_string(),
            fields: fields.to_vec(),
            ..Self::default()
        }
    }

    pub fn protocol_num(&self) -> u32 {
        self.protocol_num
    }

    pub fn set_protocol_num(&mut self, protocol_num: u32) {
        self.protocol_num = protocol_num;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Verbosity threshold; events less severe than this are dropped.
    pub fn verbose(&self) -> Level {
        self.verbose
    }

    pub fn set_verbose(&mut self, level: Level) {
        self.verbose = level;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Output field keys the decoder declares, in output order.
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn context(&self) -> Option<&DecoderContext> {
        self.ctx.as_ref()
    }

    /// Downcast the opaque context.
    pub fn context_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.ctx.as_deref().and_then(|ctx| ctx.downcast_ref::<T>())
    }

    pub fn set_context(&mut self, ctx: Option<DecoderContext>) {
        self.ctx = ctx;
    }

    pub fn output_sink(&self) -> Option<&Arc<dyn DataSink>> {
        self.output_sink.as_ref()
    }

    pub fn set_output_sink(&mut self, sink: Option<Arc<dyn DataSink>>) {
        self.output_sink = sink;
    }

    pub fn log_sink(&self) -> Option<&Arc<dyn LogSink>> {
        self.log_sink.as_ref()
    }

    pub fn set_log_sink(&mut self, sink: Option<Arc<dyn LogSink>>) {
        self.log_sink = sink;
    }

    /// Whether an event at `level` would be forwarded by this decoder.
    #[inline]
    pub fn log_enabled(&self, level: Level) -> bool {
        level.passes(self.verbose)
    }

    fn try_clone(&self) -> Result<Self, TryReserveError> {
        let mut name = String::new();
        name.try_reserve_exact(self.name.len())?;
        name.push_str(&self.name);

        let mut fields = Vec::new();
        fields.try_reserve_exact(self.fields.len())?;
        fields.extend_from_slice(&self.fields);

        Ok(Self {
            protocol_num: self.protocol_num,
            name,
            verbose: self.verbose,
            disabled: self.disabled,
            fields,
            ctx: self.ctx.clone(),
            output_sink: self.output_sink.clone(),
            log_sink: self.log_sink.clone(),
        })
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("protocol_num", &self.protocol_num)
            .field("name", &self.name)
            .field("verbose", &self.verbose)
            .field("disabled", &self.disabled)
            .field("fields", &self.fields)
            .field("ctx", &self.ctx.is_some())
            .field("output_sink", &self.output_sink.is_some())
            .field("log_sink", &self.log_sink.is_some())
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum CreateDeviceError {
    #[error("out of memory copying decoder template '{name}': {source}")]
    Alloc {
        name: String,
        #[source]
        source: TryReserveError,
    },
}

/// Create a new decoder descriptor, copied from `template` if given.
///
/// Without a template the descriptor has an empty name, protocol number 0
/// and the default `warning` threshold. With a template, every field is
/// copied; the copy owns its name and field list, so later changes to
/// either descriptor stay local to it.
///
/// Allocation failure while copying is reported as
/// [`CreateDeviceError::Alloc`]; a missing template is not an error.
pub fn create_device(template: Option<&Device>) -> Result<Device, CreateDeviceError> {
    let Some(template) = template else {
        return Ok(Device::default());
    };
    template.try_clone().map_err(|source| CreateDeviceError::Alloc {
        name: template.name.chars().take(32).collect(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_template_gives_defaults() {
        let dev = create_device(None).unwrap();
        assert_eq!(dev.name(), "");
        assert_eq!(dev.protocol_num(), 0);
        assert_eq!(dev.verbose(), Level::Warning);
        assert!(dev.fields().is_empty());
        assert!(dev.context().is_none());
        assert!(dev.output_sink().is_none());
        assert!(dev.log_sink().is_none());
    }

    #[test]
    fn clone_matches_template_and_is_independent() {
        let mut template = Device::template("FoobarCorp-XY3000", &["model", "id"]);
        template.set_protocol_num(7);
        template.set_verbose(Level::Info);

        let mut first = create_device(Some(&template)).unwrap();
        let second = create_device(Some(&template)).unwrap();
        assert_eq!(first.name(), "FoobarCorp-XY3000");
        assert_eq!(first.verbose(), Level::Info);
        assert_eq!(first.protocol_num(), 7);
        assert_eq!(first.fields(), ["model", "id"]);

        first.set_name("renamed");
        first.set_verbose(Level::Trace);
        first.set_disabled(true);

        assert_eq!(template.name(), "FoobarCorp-XY3000");
        assert_eq!(template.verbose(), Level::Info);
        assert!(!template.is_disabled());
        assert_eq!(second.name(), "FoobarCorp-XY3000");
        assert_eq!(second.verbose(), Level::Info);

        template.set_name("changed-template");
        assert_eq!(second.name(), "FoobarCorp-XY3000");
    }

    #[test]
    fn context_is_carried_and_downcast() {
        let mut template = Device::template("ctx", &[]);
        template.set_context(Some(Arc::new(0x5au8)));
        let dev = create_device(Some(&template)).unwrap();
        assert_eq!(dev.context_as::<u8>(), Some(&0x5a));
        assert_eq!(dev.context_as::<u16>(), None);
    }

    #[test]
    fn log_enabled_follows_threshold() {
        let mut dev = create_device(None).unwrap();
        assert!(dev.log_enabled(Level::Error));
        assert!(dev.log_enabled(Level::Warning));
        assert!(!dev.log_enabled(Level::Info));
        dev.set_verbose(Level::Trace);
        assert!(dev.log_enabled(Level::Trace));
    }
}
