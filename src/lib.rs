//! # usbmidi - USB-MIDI input decoding
//!
//! Decodes the 4-byte event packets of a USB-MIDI 1.0 bulk-IN endpoint into MIDI
//! messages delivered to a listener.
//!
//! ## Architecture
//!
//! usbmidi is an umbrella crate over:
//! - **usbmidi-proto** - Packet reassembly, CIN dispatch, SysEx and RPN/NRPN assembly
//! - **usbmidi-io** - Endpoint poll thread with suspend/resume/stop
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use usbmidi::{input_event_channel, MidiInputDevice};
//!
//! let (collector, events) = input_event_channel();
//! let device = MidiInputDevice::builder(endpoint)
//!     .listener(Arc::new(collector))
//!     .open()?;
//!
//! device.suspend();
//! device.resume();
//! device.stop();
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - `io`
//! - `io` - Endpoint polling (`MidiInputDevice`); decoding is always available

/// Re-export of usbmidi-proto for direct access
pub use usbmidi_proto as proto;

// Decoding
pub use usbmidi_proto::{
    input_event_channel, input_event_channel_with_capacity, Cable, CodeIndex, EventCollector,
    EventReceiver, MidiInputListener, MidiMsg, PacketDecoder, PacketReassembler, ParameterKind,
    ParameterMode, ParameterScope, ParameterUpdate, RpnNrpnTracker, StreamDecoder,
    SysExAssembler, UsbMidiEvent, UsbMidiPacket, CABLE_COUNT, PACKET_SIZE,
};

/// Re-export of usbmidi-io for direct access
#[cfg(feature = "io")]
pub use usbmidi_io as io;

#[cfg(feature = "io")]
pub use usbmidi_io::{
    DeviceState, InputConfig, InputMetrics, MetricsSnapshot, MidiInputDevice,
    MidiInputDeviceBuilder, UsbEndpoint,
};

mod error;
pub use error::{Error, Result};

pub mod prelude {
    pub use crate::{
        input_event_channel, Cable, MidiInputListener, ParameterScope, StreamDecoder,
        UsbMidiEvent,
    };

    #[cfg(feature = "io")]
    pub use crate::{InputConfig, MidiInputDevice, UsbEndpoint};
}
