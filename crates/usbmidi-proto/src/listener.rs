//! Event sink for decoded USB-MIDI input.

use crate::packet::Cable;

/// Receives decoded input, one call per event.
///
/// Every method defaults to a no-op, so implementors only override what they need.
/// Calls arrive on the decoding thread, in stream order; implementations should return
/// quickly since decoding stalls while a callback runs.
///
/// `channel` is always 0-15 and 14-bit values are 0-16383.
#[allow(unused_variables)]
pub trait MidiInputListener: Send + Sync {
    /// CIN 0, reserved for future extension.
    fn on_miscellaneous_function_codes(&self, cable: Cable, byte1: u8, byte2: u8, byte3: u8) {}

    /// CIN 1, reserved for future expansion.
    fn on_cable_events(&self, cable: Cable, byte1: u8, byte2: u8, byte3: u8) {}

    /// Two- or three-byte System Common message (CIN 2 and 3).
    fn on_system_common_message(&self, cable: Cable, bytes: &[u8]) {}

    /// Complete SysEx message, including the `F0`/`F7` framing sent by the device.
    fn on_system_exclusive(&self, cable: Cable, data: &[u8]) {}

    fn on_note_off(&self, cable: Cable, channel: u8, note: u8, velocity: u8) {}

    fn on_note_on(&self, cable: Cable, channel: u8, note: u8, velocity: u8) {}

    fn on_polyphonic_aftertouch(&self, cable: Cable, channel: u8, note: u8, pressure: u8) {}

    fn on_control_change(&self, cable: Cable, channel: u8, function: u8, value: u8) {}

    fn on_program_change(&self, cable: Cable, channel: u8, program: u8) {}

    fn on_channel_aftertouch(&self, cable: Cable, channel: u8, pressure: u8) {}

    /// 14-bit pitch wheel, 8192 = centre.
    fn on_pitch_wheel(&self, cable: Cable, channel: u8, amount: u16) {}

    /// Single byte (CIN 15), usually System Real-Time.
    fn on_single_byte(&self, cable: Cable, byte: u8) {}

    fn on_rpn_received(&self, cable: Cable, channel: u8, function: u16, value: u16) {}

    /// Same update as [`on_rpn_received`](Self::on_rpn_received), value split into
    /// 7-bit halves.
    fn on_rpn_received_split(
        &self,
        cable: Cable,
        channel: u8,
        function: u16,
        value_msb: u8,
        value_lsb: u8,
    ) {
    }

    fn on_nrpn_received(&self, cable: Cable, channel: u8, function: u16, value: u16) {}

    fn on_nrpn_received_split(
        &self,
        cable: Cable,
        channel: u8,
        function: u16,
        value_msb: u8,
        value_lsb: u8,
    ) {
    }
}
