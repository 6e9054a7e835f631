//! USB-MIDI input devices.
//!
//! Polls a claimed bulk-IN endpoint on a dedicated thread and feeds the bytes through
//! [`usbmidi_proto::StreamDecoder`]:
//!
//! - **Lifecycle**: `open` claims and starts, `stop` joins and releases
//! - **Suspend/resume**: delivery pauses while the endpoint keeps being drained
//! - **Listener hot-swap**: replace or detach the listener at any time
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use usbmidi_io::MidiInputDevice;
//! use usbmidi_proto::input_event_channel;
//!
//! let (collector, events) = input_event_channel();
//! let device = MidiInputDevice::builder(endpoint)
//!     .listener(Arc::new(collector))
//!     .open()?;
//!
//! while let Some(event) = events.recv_timeout(std::time::Duration::from_secs(1)) {
//!     println!("{:?}", event);
//! }
//! device.stop();
//! ```

pub mod error;
pub use error::{Error, Result};

mod endpoint;
pub use endpoint::UsbEndpoint;

mod config;
pub use config::InputConfig;

mod metrics;
pub use metrics::{InputMetrics, MetricsSnapshot};

mod device;
pub use device::{DeviceState, MidiInputDevice, MidiInputDeviceBuilder};

// Types that appear in this crate's public signatures
pub use usbmidi_proto::{MidiInputListener, ParameterScope};
