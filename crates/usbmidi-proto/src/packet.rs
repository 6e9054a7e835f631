//! USB-MIDI 1.0 event packets.
//!
//! Every packet on a MIDI streaming endpoint is exactly 4 bytes:
//!
//! ```text
//! byte 0: [cable number:4][code index number:4]
//! byte 1..3: MIDI payload (unused bytes are zero)
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of one USB-MIDI event packet in bytes.
pub const PACKET_SIZE: usize = 4;

/// Number of virtual cables multiplexed over one endpoint.
pub const CABLE_COUNT: usize = 16;

/// Virtual cable number (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Cable(u8);

impl Cable {
    pub fn new(number: u8) -> Result<Self> {
        if (number as usize) < CABLE_COUNT {
            Ok(Self(number))
        } else {
            Err(Error::CableOutOfRange(number))
        }
    }

    /// Builds a cable from the high nibble of a packet header.
    #[inline]
    pub fn from_header(header: u8) -> Self {
        Self(header >> 4)
    }

    #[inline]
    pub fn number(self) -> u8 {
        self.0
    }

    /// Index into per-cable tables. Always `< CABLE_COUNT`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn all() -> impl Iterator<Item = Cable> {
        (0..CABLE_COUNT as u8).map(Cable)
    }
}

impl TryFrom<u8> for Cable {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

impl From<Cable> for u8 {
    fn from(cable: Cable) -> u8 {
        cable.0
    }
}

impl fmt::Display for Cable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cable {}", self.0)
    }
}

/// Code Index Number: classifies the payload of a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CodeIndex {
    MiscellaneousFunction = 0x0,
    CableEvent = 0x1,
    SystemCommon2 = 0x2,
    SystemCommon3 = 0x3,
    SysExContinue = 0x4,
    /// SysEx ends with one byte, or a single-byte System Common message.
    SysExEnd1 = 0x5,
    SysExEnd2 = 0x6,
    SysExEnd3 = 0x7,
    NoteOff = 0x8,
    NoteOn = 0x9,
    PolyKeyPressure = 0xA,
    ControlChange = 0xB,
    ProgramChange = 0xC,
    ChannelPressure = 0xD,
    PitchBend = 0xE,
    SingleByte = 0xF,
}

impl CodeIndex {
    /// Decodes the low nibble of a packet header.
    #[inline]
    pub fn from_header(header: u8) -> Self {
        match header & 0x0F {
            0x0 => Self::MiscellaneousFunction,
            0x1 => Self::CableEvent,
            0x2 => Self::SystemCommon2,
            0x3 => Self::SystemCommon3,
            0x4 => Self::SysExContinue,
            0x5 => Self::SysExEnd1,
            0x6 => Self::SysExEnd2,
            0x7 => Self::SysExEnd3,
            0x8 => Self::NoteOff,
            0x9 => Self::NoteOn,
            0xA => Self::PolyKeyPressure,
            0xB => Self::ControlChange,
            0xC => Self::ProgramChange,
            0xD => Self::ChannelPressure,
            0xE => Self::PitchBend,
            _ => Self::SingleByte,
        }
    }

    /// Number of meaningful payload bytes carried by this packet kind.
    ///
    /// Miscellaneous function codes and cable events are reserved; all three bytes are
    /// passed through for them.
    pub fn payload_len(self) -> usize {
        match self {
            Self::SysExEnd1 | Self::SingleByte => 1,
            Self::SystemCommon2 | Self::SysExEnd2 | Self::ProgramChange | Self::ChannelPressure => 2,
            _ => 3,
        }
    }
}

impl TryFrom<u8> for CodeIndex {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if value > 0x0F {
            return Err(Error::CodeIndexOutOfRange(value));
        }
        Ok(Self::from_header(value))
    }
}

/// One 4-byte USB-MIDI event packet.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UsbMidiPacket([u8; PACKET_SIZE]);

impl UsbMidiPacket {
    #[inline]
    pub fn from_bytes(bytes: [u8; PACKET_SIZE]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn new(cable: Cable, cin: CodeIndex, payload: [u8; 3]) -> Self {
        Self([
            (cable.number() << 4) | cin as u8,
            payload[0],
            payload[1],
            payload[2],
        ])
    }

    #[inline]
    pub fn cable(&self) -> Cable {
        Cable::from_header(self.0[0])
    }

    #[inline]
    pub fn code_index(&self) -> CodeIndex {
        CodeIndex::from_header(self.0[0])
    }

    #[inline]
    pub fn payload(&self) -> [u8; 3] {
        [self.0[1], self.0[2], self.0[3]]
    }

    /// Meaningful payload bytes, per the code index.
    pub fn midi_bytes(&self) -> &[u8] {
        &self.0[1..1 + self.code_index().payload_len()]
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; PACKET_SIZE] {
        &self.0
    }
}

impl TryFrom<&[u8]> for UsbMidiPacket {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; PACKET_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::PacketLength(bytes.len()))?;
        Ok(Self(raw))
    }
}

impl fmt::Debug for UsbMidiPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbMidiPacket")
            .field("cable", &self.cable().number())
            .field("cin", &self.code_index())
            .field("payload", &format_args!("{:02X?}", self.payload()))
            .finish()
    }
}
