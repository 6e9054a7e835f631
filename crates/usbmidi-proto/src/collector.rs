//! Channel-backed listener for consuming input on another thread.

use crate::event::UsbMidiEvent;
use crate::listener::MidiInputListener;
use crate::packet::Cable;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::time::Duration;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 1024;

/// Listener that forwards every event into a bounded channel.
///
/// Events are dropped (with a debug log) when the channel is full; decoding never
/// blocks on a slow consumer. Only the combined RPN/NRPN form is forwarded.
#[derive(Clone)]
pub struct EventCollector {
    sender: Sender<UsbMidiEvent>,
}

impl EventCollector {
    #[inline]
    fn push(&self, event: UsbMidiEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!("Input event channel full, dropping {:?}", event);
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

impl MidiInputListener for EventCollector {
    fn on_miscellaneous_function_codes(&self, cable: Cable, byte1: u8, byte2: u8, byte3: u8) {
        self.push(UsbMidiEvent::MiscellaneousFunctionCodes {
            cable,
            data: [byte1, byte2, byte3],
        });
    }

    fn on_cable_events(&self, cable: Cable, byte1: u8, byte2: u8, byte3: u8) {
        self.push(UsbMidiEvent::CableEvents {
            cable,
            data: [byte1, byte2, byte3],
        });
    }

    fn on_system_common_message(&self, cable: Cable, bytes: &[u8]) {
        self.push(UsbMidiEvent::SystemCommon {
            cable,
            data: bytes.into(),
        });
    }

    fn on_system_exclusive(&self, cable: Cable, data: &[u8]) {
        self.push(UsbMidiEvent::SystemExclusive {
            cable,
            data: data.to_vec(),
        });
    }

    fn on_note_off(&self, cable: Cable, channel: u8, note: u8, velocity: u8) {
        self.push(UsbMidiEvent::NoteOff {
            cable,
            channel,
            note,
            velocity,
        });
    }

    fn on_note_on(&self, cable: Cable, channel: u8, note: u8, velocity: u8) {
        self.push(UsbMidiEvent::NoteOn {
            cable,
            channel,
            note,
            velocity,
        });
    }

    fn on_polyphonic_aftertouch(&self, cable: Cable, channel: u8, note: u8, pressure: u8) {
        self.push(UsbMidiEvent::PolyphonicAftertouch {
            cable,
            channel,
            note,
            pressure,
        });
    }

    fn on_control_change(&self, cable: Cable, channel: u8, function: u8, value: u8) {
        self.push(UsbMidiEvent::ControlChange {
            cable,
            channel,
            function,
            value,
        });
    }

    fn on_program_change(&self, cable: Cable, channel: u8, program: u8) {
        self.push(UsbMidiEvent::ProgramChange {
            cable,
            channel,
            program,
        });
    }

    fn on_channel_aftertouch(&self, cable: Cable, channel: u8, pressure: u8) {
        self.push(UsbMidiEvent::ChannelAftertouch {
            cable,
            channel,
            pressure,
        });
    }

    fn on_pitch_wheel(&self, cable: Cable, channel: u8, amount: u16) {
        self.push(UsbMidiEvent::PitchWheel {
            cable,
            channel,
            amount,
        });
    }

    fn on_single_byte(&self, cable: Cable, byte: u8) {
        self.push(UsbMidiEvent::SingleByte { cable, byte });
    }

    fn on_rpn_received(&self, cable: Cable, channel: u8, function: u16, value: u16) {
        self.push(UsbMidiEvent::RpnReceived {
            cable,
            channel,
            function,
            value,
        });
    }

    fn on_nrpn_received(&self, cable: Cable, channel: u8, function: u16, value: u16) {
        self.push(UsbMidiEvent::NrpnReceived {
            cable,
            channel,
            function,
            value,
        });
    }
}

/// Consumer side of an [`EventCollector`].
pub struct EventReceiver {
    receiver: Receiver<UsbMidiEvent>,
}

impl EventReceiver {
    #[inline]
    pub fn pop(&self) -> Option<UsbMidiEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout`; `None` on timeout or when every collector is gone.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<UsbMidiEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    pub fn drain_all(&self) -> Vec<UsbMidiEvent> {
        self.receiver.try_iter().collect()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

pub fn input_event_channel() -> (EventCollector, EventReceiver) {
    input_event_channel_with_capacity(DEFAULT_CAPACITY)
}

pub fn input_event_channel_with_capacity(capacity: usize) -> (EventCollector, EventReceiver) {
    let (sender, receiver) = bounded(capacity.max(1));
    (EventCollector { sender }, EventReceiver { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_in_order() {
        let (collector, receiver) = input_event_channel();
        let cable = Cable::new(1).unwrap();
        collector.on_note_on(cable, 0, 60, 90);
        collector.on_single_byte(cable, 0xFA);

        let events = receiver.drain_all();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], UsbMidiEvent::NoteOn { note: 60, .. }));
        assert!(matches!(events[1], UsbMidiEvent::SingleByte { byte: 0xFA, .. }));
    }

    #[test]
    fn test_full_channel_drops_newest() {
        let (collector, receiver) = input_event_channel_with_capacity(2);
        let cable = Cable::default();
        for program in 0..5 {
            collector.on_program_change(cable, 0, program);
        }
        assert_eq!(receiver.pending_count(), 2);
        assert!(matches!(
            receiver.pop(),
            Some(UsbMidiEvent::ProgramChange { program: 0, .. })
        ));
    }

    #[test]
    fn test_split_rpn_form_is_not_forwarded() {
        let (collector, receiver) = input_event_channel();
        collector.on_rpn_received_split(Cable::default(), 0, 0, 1, 2);
        assert!(receiver.pop().is_none());
    }

    #[test]
    fn test_recv_timeout_after_collector_dropped() {
        let (collector, receiver) = input_event_channel();
        drop(collector);
        assert!(receiver
            .recv_timeout(Duration::from_millis(10))
            .is_none());
    }
}
