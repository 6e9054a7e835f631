//! Owned representation of decoded input events.

use crate::packet::Cable;
use midi_msg::{Channel, ChannelVoiceMsg, ControlChange, MidiMsg};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One decoded unit, mirroring the [`MidiInputListener`](crate::MidiInputListener)
/// callbacks. RPN/NRPN updates carry the combined 14-bit value; use
/// [`value_msb`](Self::value_msb) / [`value_lsb`](Self::value_lsb) for the split form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsbMidiEvent {
    MiscellaneousFunctionCodes {
        cable: Cable,
        data: [u8; 3],
    },
    CableEvents {
        cable: Cable,
        data: [u8; 3],
    },
    SystemCommon {
        cable: Cable,
        data: SmallVec<[u8; 3]>,
    },
    SystemExclusive {
        cable: Cable,
        data: Vec<u8>,
    },
    NoteOff {
        cable: Cable,
        channel: u8,
        note: u8,
        velocity: u8,
    },
    NoteOn {
        cable: Cable,
        channel: u8,
        note: u8,
        velocity: u8,
    },
    PolyphonicAftertouch {
        cable: Cable,
        channel: u8,
        note: u8,
        pressure: u8,
    },
    ControlChange {
        cable: Cable,
        channel: u8,
        function: u8,
        value: u8,
    },
    ProgramChange {
        cable: Cable,
        channel: u8,
        program: u8,
    },
    ChannelAftertouch {
        cable: Cable,
        channel: u8,
        pressure: u8,
    },
    PitchWheel {
        cable: Cable,
        channel: u8,
        amount: u16,
    },
    SingleByte {
        cable: Cable,
        byte: u8,
    },
    RpnReceived {
        cable: Cable,
        channel: u8,
        function: u16,
        value: u16,
    },
    NrpnReceived {
        cable: Cable,
        channel: u8,
        function: u16,
        value: u16,
    },
}

impl UsbMidiEvent {
    pub fn cable(&self) -> Cable {
        match *self {
            Self::MiscellaneousFunctionCodes { cable, .. }
            | Self::CableEvents { cable, .. }
            | Self::SystemCommon { cable, .. }
            | Self::SystemExclusive { cable, .. }
            | Self::NoteOff { cable, .. }
            | Self::NoteOn { cable, .. }
            | Self::PolyphonicAftertouch { cable, .. }
            | Self::ControlChange { cable, .. }
            | Self::ProgramChange { cable, .. }
            | Self::ChannelAftertouch { cable, .. }
            | Self::PitchWheel { cable, .. }
            | Self::SingleByte { cable, .. }
            | Self::RpnReceived { cable, .. }
            | Self::NrpnReceived { cable, .. } => cable,
        }
    }

    /// MIDI channel (0-15) for channel messages.
    pub fn channel(&self) -> Option<u8> {
        match *self {
            Self::NoteOff { channel, .. }
            | Self::NoteOn { channel, .. }
            | Self::PolyphonicAftertouch { channel, .. }
            | Self::ControlChange { channel, .. }
            | Self::ProgramChange { channel, .. }
            | Self::ChannelAftertouch { channel, .. }
            | Self::PitchWheel { channel, .. }
            | Self::RpnReceived { channel, .. }
            | Self::NrpnReceived { channel, .. } => Some(channel),
            _ => None,
        }
    }

    pub fn value_msb(&self) -> Option<u8> {
        match *self {
            Self::RpnReceived { value, .. } | Self::NrpnReceived { value, .. } => {
                Some(((value >> 7) & 0x7F) as u8)
            }
            _ => None,
        }
    }

    pub fn value_lsb(&self) -> Option<u8> {
        match *self {
            Self::RpnReceived { value, .. } | Self::NrpnReceived { value, .. } => {
                Some((value & 0x7F) as u8)
            }
            _ => None,
        }
    }

    /// Converts channel voice events to a `midi-msg` message.
    ///
    /// RPN/NRPN updates are synthesized from several Control Changes and have no
    /// single-message form; they return `None`, as do system events.
    pub fn to_midi_msg(&self) -> Option<MidiMsg> {
        let (channel, msg) = match *self {
            Self::NoteOff {
                channel,
                note,
                velocity,
                ..
            } => (channel, ChannelVoiceMsg::NoteOff { note, velocity }),
            Self::NoteOn {
                channel,
                note,
                velocity,
                ..
            } => (channel, ChannelVoiceMsg::NoteOn { note, velocity }),
            Self::PolyphonicAftertouch {
                channel,
                note,
                pressure,
                ..
            } => (channel, ChannelVoiceMsg::PolyPressure { note, pressure }),
            Self::ControlChange {
                channel,
                function,
                value,
                ..
            } => (
                channel,
                ChannelVoiceMsg::ControlChange {
                    control: ControlChange::CC {
                        control: function,
                        value,
                    },
                },
            ),
            Self::ProgramChange {
                channel, program, ..
            } => (channel, ChannelVoiceMsg::ProgramChange { program }),
            Self::ChannelAftertouch {
                channel, pressure, ..
            } => (channel, ChannelVoiceMsg::ChannelPressure { pressure }),
            Self::PitchWheel {
                channel, amount, ..
            } => (channel, ChannelVoiceMsg::PitchBend { bend: amount }),
            _ => return None,
        };

        Some(MidiMsg::ChannelVoice {
            channel: Channel::from_u8(channel),
            msg,
        })
    }
}
