//! Fluent configuration for [`MidiInputDevice`].

use std::sync::Arc;
use std::time::Duration;

use usbmidi_proto::{MidiInputListener, ParameterScope};

use super::MidiInputDevice;
use crate::config::InputConfig;
use crate::endpoint::UsbEndpoint;
use crate::error::Result;

pub struct MidiInputDeviceBuilder {
    pub(super) endpoint: Arc<dyn UsbEndpoint>,
    pub(super) config: InputConfig,
    pub(super) listener: Option<Arc<dyn MidiInputListener>>,
}

impl MidiInputDeviceBuilder {
    pub(super) fn new(endpoint: Arc<dyn UsbEndpoint>) -> Self {
        Self {
            endpoint,
            config: InputConfig::default(),
            listener: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: InputConfig) -> Self {
        self.config = config;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = timeout;
        self
    }

    pub fn suspend_wait(mut self, wait: Duration) -> Self {
        self.config.suspend_wait = wait;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = Some(name.into());
        self
    }

    /// Keeps the poll thread at its default priority.
    pub fn normal_priority(mut self) -> Self {
        self.config.elevated_priority = false;
        self
    }

    pub fn parameter_scope(mut self, scope: ParameterScope) -> Self {
        self.config.parameter_scope = scope;
        self
    }

    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = Some(size);
        self
    }

    /// Installs a listener before the first read, so no early traffic is missed.
    pub fn listener(mut self, listener: Arc<dyn MidiInputListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Claims the endpoint and starts polling.
    pub fn open(self) -> Result<MidiInputDevice> {
        MidiInputDevice::start(self.endpoint, self.config, self.listener)
    }
}
