//! Centralized error type for the usbmidi umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Decoding: {0}")]
    Proto(#[from] usbmidi_proto::Error),

    #[cfg(feature = "io")]
    #[error("Device: {0}")]
    Device(#[from] usbmidi_io::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
