//! The endpoint poll loop.

use super::suspend::SuspendGate;
use super::DeviceState;
use crate::config::InputConfig;
use crate::endpoint::UsbEndpoint;
use crate::metrics::InputMetrics;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use thread_priority::ThreadPriority;
use tracing::{debug, trace, warn};
use usbmidi_proto::{Cable, MidiInputListener, StreamDecoder};

pub(crate) type ListenerSlot = ArcSwap<Option<Arc<dyn MidiInputListener>>>;

/// State shared between the device handle and its poll thread.
pub(crate) struct PollShared {
    pub listener: ListenerSlot,
    pub stop: AtomicBool,
    pub gate: SuspendGate,
    pub state: AtomicU8,
    pub metrics: Arc<InputMetrics>,
}

impl PollShared {
    pub fn new(metrics: Arc<InputMetrics>) -> Self {
        Self {
            listener: ArcSwap::from_pointee(None),
            stop: AtomicBool::new(false),
            gate: SuspendGate::new(),
            state: AtomicU8::new(DeviceState::Created as u8),
            metrics,
        }
    }
}

/// Consecutive failed reads tolerated before the loop starts pausing between reads.
const ERROR_BURST: u32 = 3;

/// Releases the endpoint claim when the poll thread exits, panics included.
struct ClaimGuard(Arc<dyn UsbEndpoint>);

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        self.0.release();
        debug!("Released {}", self.0.device_address());
    }
}

pub(crate) fn poll_loop(endpoint: Arc<dyn UsbEndpoint>, shared: Arc<PollShared>, config: InputConfig) {
    let _claim = ClaimGuard(Arc::clone(&endpoint));

    if config.elevated_priority {
        if let Err(e) = thread_priority::set_current_thread_priority(ThreadPriority::Max) {
            warn!("Could not raise USB-MIDI poll thread priority: {:?}", e);
        }
    }

    let max_packet_size = endpoint.max_packet_size();
    let mut scratch = vec![0u8; config.scratch_size(max_packet_size)];
    let mut decoder =
        StreamDecoder::with_capacity(config.parameter_scope, scratch.len() + max_packet_size);
    let metrics = &shared.metrics;
    let error_pause = config.read_timeout;
    let mut failed_reads = 0u32;

    // Loses to a concurrent stop(), which has already stored `Stopped`.
    let _ = shared.state.compare_exchange(
        DeviceState::Created as u8,
        DeviceState::Running as u8,
        Ordering::AcqRel,
        Ordering::Acquire,
    );

    debug!(
        "Polling {} ({} byte reads)",
        endpoint.device_address(),
        scratch.len()
    );

    while !shared.stop.load(Ordering::Acquire) {
        let len = match endpoint.read(&mut scratch, config.read_timeout) {
            Ok(n) => {
                failed_reads = 0;
                n.min(scratch.len())
            }
            Err(e) => {
                trace!("Endpoint read failed: {}", e);
                failed_reads = failed_reads.saturating_add(1);
                if failed_reads == ERROR_BURST {
                    debug!(
                        "{} keeps failing reads, pausing {:?} between attempts",
                        endpoint.device_address(),
                        error_pause
                    );
                }
                if failed_reads >= ERROR_BURST {
                    shared.gate.pause(error_pause);
                }
                0
            }
        };

        if shared.gate.is_suspended() {
            if len == 0 {
                metrics.record_empty_read();
            } else {
                // Keep framing and state machines in step; deliver nothing.
                decoder.push(&scratch[..len], None);
                metrics.record_discarded(len);
            }
            shared.gate.wait_if_suspended(config.suspend_wait);
            continue;
        }

        if len == 0 {
            metrics.record_empty_read();
            continue;
        }

        let listener = shared.listener.load_full();
        let packets = match (*listener).as_deref() {
            Some(inner) => {
                let gated = StopGated {
                    inner,
                    stop: &shared.stop,
                };
                decoder.push(&scratch[..len], Some(&gated))
            }
            None => decoder.push(&scratch[..len], None),
        };
        metrics.record_read(len, packets);
        trace!("Read {} bytes, decoded {} packets", len, packets);
    }

    debug!("Poll loop for {} exiting", endpoint.device_address());
}

/// Forwards to the listener until the stop flag is raised, including by the listener
/// itself midway through a read.
struct StopGated<'a> {
    inner: &'a dyn MidiInputListener,
    stop: &'a AtomicBool,
}

impl StopGated<'_> {
    #[inline]
    fn open(&self) -> bool {
        !self.stop.load(Ordering::Acquire)
    }
}

impl MidiInputListener for StopGated<'_> {
    fn on_miscellaneous_function_codes(&self, cable: Cable, byte1: u8, byte2: u8, byte3: u8) {
        if self.open() {
            self.inner.on_miscellaneous_function_codes(cable, byte1, byte2, byte3);
        }
    }

    fn on_cable_events(&self, cable: Cable, byte1: u8, byte2: u8, byte3: u8) {
        if self.open() {
            self.inner.on_cable_events(cable, byte1, byte2, byte3);
        }
    }

    fn on_system_common_message(&self, cable: Cable, bytes: &[u8]) {
        if self.open() {
            self.inner.on_system_common_message(cable, bytes);
        }
    }

    fn on_system_exclusive(&self, cable: Cable, data: &[u8]) {
        if self.open() {
            self.inner.on_system_exclusive(cable, data);
        }
    }

    fn on_note_off(&self, cable: Cable, channel: u8, note: u8, velocity: u8) {
        if self.open() {
            self.inner.on_note_off(cable, channel, note, velocity);
        }
    }

    fn on_note_on(&self, cable: Cable, channel: u8, note: u8, velocity: u8) {
        if self.open() {
            self.inner.on_note_on(cable, channel, note, velocity);
        }
    }

    fn on_polyphonic_aftertouch(&self, cable: Cable, channel: u8, note: u8, pressure: u8) {
        if self.open() {
            self.inner.on_polyphonic_aftertouch(cable, channel, note, pressure);
        }
    }

    fn on_control_change(&self, cable: Cable, channel: u8, function: u8, value: u8) {
        if self.open() {
            self.inner.on_control_change(cable, channel, function, value);
        }
    }

    fn on_program_change(&self, cable: Cable, channel: u8, program: u8) {
        if self.open() {
            self.inner.on_program_change(cable, channel, program);
        }
    }

    fn on_channel_aftertouch(&self, cable: Cable, channel: u8, pressure: u8) {
        if self.open() {
            self.inner.on_channel_aftertouch(cable, channel, pressure);
        }
    }

    fn on_pitch_wheel(&self, cable: Cable, channel: u8, amount: u16) {
        if self.open() {
            self.inner.on_pitch_wheel(cable, channel, amount);
        }
    }

    fn on_single_byte(&self, cable: Cable, byte: u8) {
        if self.open() {
            self.inner.on_single_byte(cable, byte);
        }
    }

    fn on_rpn_received(&self, cable: Cable, channel: u8, function: u16, value: u16) {
        if self.open() {
            self.inner.on_rpn_received(cable, channel, function, value);
        }
    }

    fn on_rpn_received_split(
        &self,
        cable: Cable,
        channel: u8,
        function: u16,
        value_msb: u8,
        value_lsb: u8,
    ) {
        if self.open() {
            self.inner
                .on_rpn_received_split(cable, channel, function, value_msb, value_lsb);
        }
    }

    fn on_nrpn_received(&self, cable: Cable, channel: u8, function: u16, value: u16) {
        if self.open() {
            self.inner.on_nrpn_received(cable, channel, function, value);
        }
    }

    fn on_nrpn_received_split(
        &self,
        cable: Cable,
        channel: u8,
        function: u16,
        value_msb: u8,
        value_lsb: u8,
    ) {
        if self.open() {
            self.inner
                .on_nrpn_received_split(cable, channel, function, value_msb, value_lsb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Notes(Mutex<Vec<u8>>);

    impl MidiInputListener for Notes {
        fn on_note_on(&self, _cable: Cable, _channel: u8, note: u8, _velocity: u8) {
            self.0.lock().push(note);
        }
    }

    #[test]
    fn test_stop_gated_listener_goes_silent() {
        let notes = Notes::default();
        let stop = AtomicBool::new(false);
        let gated = StopGated {
            inner: &notes,
            stop: &stop,
        };

        let mut decoder = StreamDecoder::default();
        decoder.push(&[0x09, 0x90, 60, 100], Some(&gated));
        stop.store(true, Ordering::Release);
        decoder.push(&[0x09, 0x90, 62, 100], Some(&gated));

        assert_eq!(*notes.0.lock(), vec![60]);
    }
}
