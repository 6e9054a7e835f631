//! Input device lifecycle: claim, poll thread, suspend/resume, stop.

mod builder;
mod poll;
mod suspend;

pub use builder::MidiInputDeviceBuilder;

use crate::config::InputConfig;
use crate::endpoint::UsbEndpoint;
use crate::error::{Error, Result};
use crate::metrics::InputMetrics;
use parking_lot::Mutex;
use poll::{poll_loop, PollShared};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, warn};
use usbmidi_proto::MidiInputListener;

/// Lifecycle of a [`MidiInputDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceState {
    /// Endpoint claimed, poll thread spawned but not yet reading
    Created = 0,
    Running = 1,
    /// Terminal; no callback runs once `stop()` has returned
    Stopped = 2,
}

impl DeviceState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => DeviceState::Created,
            1 => DeviceState::Running,
            _ => DeviceState::Stopped,
        }
    }
}

/// A USB-MIDI input endpoint being polled on a dedicated thread.
///
/// Decoded messages go to the current listener, if any. Dropping the device stops it.
pub struct MidiInputDevice {
    endpoint: Arc<dyn UsbEndpoint>,
    shared: Arc<PollShared>,
    poll_thread: ThreadId,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl MidiInputDevice {
    /// Claims `endpoint` and starts polling with `config`.
    pub fn open(endpoint: Arc<dyn UsbEndpoint>, config: InputConfig) -> Result<Self> {
        Self::start(endpoint, config, None)
    }

    pub fn builder(endpoint: Arc<dyn UsbEndpoint>) -> MidiInputDeviceBuilder {
        MidiInputDeviceBuilder::new(endpoint)
    }

    fn start(
        endpoint: Arc<dyn UsbEndpoint>,
        config: InputConfig,
        listener: Option<Arc<dyn MidiInputListener>>,
    ) -> Result<Self> {
        config.validate()?;

        let address = endpoint.device_address();
        if endpoint.max_packet_size() == 0 {
            return Err(Error::EndpointUnusable(format!(
                "{} reports a zero max packet size",
                address
            )));
        }
        endpoint
            .claim()
            .map_err(|e| Error::EndpointUnusable(format!("{}: {}", address, e)))?;

        let shared = Arc::new(PollShared::new(Arc::new(InputMetrics::new())));
        shared.listener.store(Arc::new(listener));

        let thread_name = config
            .thread_name
            .clone()
            .unwrap_or_else(|| format!("usbmidi-in {}", address));

        let spawned = {
            let endpoint = Arc::clone(&endpoint);
            let shared = Arc::clone(&shared);
            thread::Builder::new()
                .name(thread_name)
                .spawn(move || poll_loop(endpoint, shared, config))
        };
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                endpoint.release();
                return Err(Error::Io(e));
            }
        };

        debug!("Opened USB-MIDI input {}", address);

        Ok(Self {
            endpoint,
            shared,
            poll_thread: handle.thread().id(),
            thread_handle: Mutex::new(Some(handle)),
        })
    }

    /// Replaces the listener. `None` detaches it; decoding continues regardless.
    pub fn set_listener(&self, listener: Option<Arc<dyn MidiInputListener>>) {
        self.shared.listener.store(Arc::new(listener));
    }

    /// Stops delivering messages. Reads continue so the endpoint keeps draining.
    pub fn suspend(&self) {
        self.shared.gate.suspend();
        debug!("Suspended USB-MIDI input {}", self.endpoint.device_address());
    }

    pub fn resume(&self) {
        self.shared.gate.resume();
        debug!("Resumed USB-MIDI input {}", self.endpoint.device_address());
    }

    /// Stops the poll thread; the thread releases the endpoint claim on its way out.
    ///
    /// Blocks until the thread has exited, so no callback runs after this returns. This
    /// holds for every caller, including concurrent ones, which wait for the same join.
    /// Called from inside a callback it cannot join its own thread: it returns at once,
    /// and the rest of the current read is not delivered. Calling it again is a no-op.
    pub fn stop(&self) {
        self.shared
            .state
            .store(DeviceState::Stopped as u8, Ordering::Release);
        self.set_listener(None);
        self.shared.stop.store(true, Ordering::Release);
        self.shared.gate.wake();

        if thread::current().id() == self.poll_thread {
            return;
        }

        // Held across the join so concurrent callers return only once the thread is gone.
        let mut slot = self.thread_handle.lock();
        if let Some(handle) = slot.take() {
            if handle.join().is_err() {
                warn!(
                    "USB-MIDI poll thread for {} panicked",
                    self.endpoint.device_address()
                );
            }
            debug!("Stopped USB-MIDI input {}", self.endpoint.device_address());
        }
    }

    pub fn state(&self) -> DeviceState {
        DeviceState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    pub fn is_suspended(&self) -> bool {
        self.shared.gate.is_suspended()
    }

    pub fn metrics(&self) -> Arc<InputMetrics> {
        Arc::clone(&self.shared.metrics)
    }

    pub fn device_address(&self) -> String {
        self.endpoint.device_address()
    }

    pub fn product_name(&self) -> Option<String> {
        self.endpoint.product_name()
    }

    pub fn manufacturer_name(&self) -> Option<String> {
        self.endpoint.manufacturer_name()
    }
}

impl Drop for MidiInputDevice {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for MidiInputDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MidiInputDevice")
            .field("address", &self.endpoint.device_address())
            .field("state", &self.state())
            .field("suspended", &self.is_suspended())
            .finish()
    }
}
