//! USB-MIDI input decoding.
//!
//! Turns the raw byte stream of a USB-MIDI bulk-IN endpoint into typed events:
//!
//! - **Reassembly**: carries partial 4-byte packets across reads
//! - **Dispatch**: routes packets by Code Index Number to listener callbacks
//! - **SysEx**: reassembles multi-packet System Exclusive messages per virtual cable
//! - **RPN/NRPN**: accumulates 14-bit parameter values across Control Changes
//!
//! Nothing here performs I/O; see `usbmidi-io` for the polling device.
//!
//! # Example
//!
//! ```
//! use usbmidi_proto::{input_event_channel, StreamDecoder, UsbMidiEvent};
//!
//! let (collector, events) = input_event_channel();
//! let mut decoder = StreamDecoder::default();
//!
//! // Note On, cable 0, channel 0, split across two reads
//! decoder.push(&[0x09, 0x90], Some(&collector));
//! decoder.push(&[60, 100], Some(&collector));
//!
//! assert!(matches!(events.pop(), Some(UsbMidiEvent::NoteOn { note: 60, .. })));
//! ```

pub mod error;
pub use error::{Error, Result};

mod packet;
pub use packet::{Cable, CodeIndex, UsbMidiPacket, CABLE_COUNT, PACKET_SIZE};

mod reassembly;
pub use reassembly::PacketReassembler;

mod sysex;
pub use sysex::SysExAssembler;

pub mod rpn;
pub use rpn::{ParameterKind, ParameterMode, ParameterScope, ParameterUpdate, RpnNrpnTracker};

mod listener;
pub use listener::MidiInputListener;

mod decoder;
pub use decoder::{PacketDecoder, StreamDecoder};

mod event;
pub use event::UsbMidiEvent;

pub mod collector;
pub use collector::{
    input_event_channel, input_event_channel_with_capacity, EventCollector, EventReceiver,
};

// Re-export so callers converting events don't need midi-msg directly
pub use midi_msg::MidiMsg;
