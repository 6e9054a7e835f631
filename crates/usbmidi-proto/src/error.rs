//! Error types for USB-MIDI packet decoding.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("USB-MIDI packet must be 4 bytes, got {0}")]
    PacketLength(usize),

    #[error("Cable number out of range: {0} (expected 0-15)")]
    CableOutOfRange(u8),

    #[error("Code index number out of range: {0} (expected 0-15)")]
    CodeIndexOutOfRange(u8),
}

pub type Result<T> = std::result::Result<T, Error>;
