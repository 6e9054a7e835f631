//! Packet dispatch: routes each packet to direct emission, SysEx reassembly or the
//! RPN/NRPN tracker.
//!
//! Decoding is tolerant. Nothing here fails; state machines are updated whether or not
//! a listener is attached, and only emission is skipped when it is absent.

use crate::listener::MidiInputListener;
use crate::packet::{Cable, CodeIndex, UsbMidiPacket};
use crate::reassembly::PacketReassembler;
use crate::rpn::{ParameterKind, ParameterScope, ParameterUpdate, RpnNrpnTracker};
use crate::sysex::SysExAssembler;
use tracing::trace;

#[derive(Debug, Default)]
pub struct PacketDecoder {
    sysex: SysExAssembler,
    parameters: RpnNrpnTracker,
}

impl PacketDecoder {
    pub fn new(scope: ParameterScope) -> Self {
        Self {
            sysex: SysExAssembler::new(),
            parameters: RpnNrpnTracker::new(scope),
        }
    }

    pub fn sysex(&self) -> &SysExAssembler {
        &self.sysex
    }

    pub fn parameters(&self) -> &RpnNrpnTracker {
        &self.parameters
    }

    pub fn decode(&mut self, packet: UsbMidiPacket, listener: Option<&dyn MidiInputListener>) {
        let cable = packet.cable();
        let [byte1, byte2, byte3] = packet.payload();
        let channel = byte1 & 0x0F;

        match packet.code_index() {
            CodeIndex::MiscellaneousFunction => {
                if let Some(l) = listener {
                    l.on_miscellaneous_function_codes(cable, byte1, byte2, byte3);
                }
            }
            CodeIndex::CableEvent => {
                if let Some(l) = listener {
                    l.on_cable_events(cable, byte1, byte2, byte3);
                }
            }
            CodeIndex::SystemCommon2 => {
                if let Some(l) = listener {
                    l.on_system_common_message(cable, &[byte1, byte2]);
                }
            }
            CodeIndex::SystemCommon3 => {
                if let Some(l) = listener {
                    l.on_system_common_message(cable, &[byte1, byte2, byte3]);
                }
            }
            CodeIndex::SysExContinue => self.sysex.append(cable, &[byte1, byte2, byte3]),
            // CIN 5 doubles as "single-byte System Common"; it is always treated as a
            // one-byte SysEx terminator.
            CodeIndex::SysExEnd1 | CodeIndex::SysExEnd2 | CodeIndex::SysExEnd3 => {
                self.finish_sysex(cable, packet.midi_bytes(), listener)
            }
            CodeIndex::NoteOff => {
                if let Some(l) = listener {
                    l.on_note_off(cable, channel, byte2, byte3);
                }
            }
            CodeIndex::NoteOn => {
                if let Some(l) = listener {
                    if byte3 == 0 {
                        l.on_note_off(cable, channel, byte2, byte3);
                    } else {
                        l.on_note_on(cable, channel, byte2, byte3);
                    }
                }
            }
            CodeIndex::PolyKeyPressure => {
                if let Some(l) = listener {
                    l.on_polyphonic_aftertouch(cable, channel, byte2, byte3);
                }
            }
            CodeIndex::ControlChange => {
                if let Some(l) = listener {
                    l.on_control_change(cable, channel, byte2, byte3);
                }
                if let Some(update) = self.parameters.process(cable, byte2, byte3) {
                    if let Some(l) = listener {
                        emit_parameter(l, cable, channel, update);
                    }
                }
            }
            CodeIndex::ProgramChange => {
                if let Some(l) = listener {
                    l.on_program_change(cable, channel, byte2);
                }
            }
            CodeIndex::ChannelPressure => {
                if let Some(l) = listener {
                    l.on_channel_aftertouch(cable, channel, byte2);
                }
            }
            CodeIndex::PitchBend => {
                if let Some(l) = listener {
                    let amount = u16::from(byte2 & 0x7F) | (u16::from(byte3 & 0x7F) << 7);
                    l.on_pitch_wheel(cable, channel, amount);
                }
            }
            CodeIndex::SingleByte => {
                if let Some(l) = listener {
                    l.on_single_byte(cable, byte1);
                }
            }
        }
    }

    fn finish_sysex(&self, cable: Cable, tail: &[u8], listener: Option<&dyn MidiInputListener>) {
        self.sysex.finish(cable, tail, |message| {
            trace!("SysEx complete on {}: {} bytes", cable, message.len());
            if let Some(l) = listener {
                l.on_system_exclusive(cable, message);
            }
        });
    }
}

fn emit_parameter(
    listener: &dyn MidiInputListener,
    cable: Cable,
    channel: u8,
    update: ParameterUpdate,
) {
    let (msb, lsb) = (update.msb(), update.lsb());
    match update.kind {
        ParameterKind::Registered => {
            listener.on_rpn_received(cable, channel, update.function, update.value);
            listener.on_rpn_received_split(cable, channel, update.function, msb, lsb);
        }
        ParameterKind::NonRegistered => {
            listener.on_nrpn_received(cable, channel, update.function, update.value);
            listener.on_nrpn_received_split(cable, channel, update.function, msb, lsb);
        }
    }
}

/// Reassembler and dispatcher combined: raw endpoint bytes in, listener calls out.
///
/// This is what the poll loop drives, and it works just as well for replaying
/// captured traffic.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    reassembler: PacketReassembler,
    decoder: PacketDecoder,
}

impl StreamDecoder {
    pub fn new(scope: ParameterScope) -> Self {
        Self {
            reassembler: PacketReassembler::new(),
            decoder: PacketDecoder::new(scope),
        }
    }

    pub fn with_capacity(scope: ParameterScope, capacity: usize) -> Self {
        Self {
            reassembler: PacketReassembler::with_capacity(capacity),
            decoder: PacketDecoder::new(scope),
        }
    }

    /// Decodes every complete packet in `chunk` (plus carry-over). Returns the number
    /// of packets decoded.
    pub fn push(&mut self, chunk: &[u8], listener: Option<&dyn MidiInputListener>) -> usize {
        let decoder = &mut self.decoder;
        self.reassembler
            .push(chunk, |packet| decoder.decode(packet, listener))
    }

    pub fn reassembler(&self) -> &PacketReassembler {
        &self.reassembler
    }

    pub fn decoder(&self) -> &PacketDecoder {
        &self.decoder
    }

    /// Drops carry-over, partial SysEx and parameter state.
    pub fn reset(&mut self) {
        self.reassembler.clear();
        self.decoder.sysex.reset_all();
        self.decoder.parameters.reset();
    }
}
