//! The USB collaborator seen from the input device.
//!
//! Discovery, permissions and interface selection happen elsewhere; by the time a
//! device is opened the caller holds an endpoint that only needs to be claimed and read.

use std::io;
use std::time::Duration;

/// A bulk-IN endpoint of a USB-MIDI streaming interface.
///
/// Shared between the owning device manager and the poll thread, hence `Send + Sync`
/// and `&self` methods.
pub trait UsbEndpoint: Send + Sync {
    /// Reads up to `buf.len()` bytes, blocking for at most `timeout`.
    ///
    /// `Ok(0)` and `Err(_)` both mean nothing arrived this cycle; the poll loop does not
    /// retry or surface either.
    fn read(&self, buf: &mut [u8], timeout: Duration) -> io::Result<usize>;

    /// Claims the interface this endpoint belongs to.
    fn claim(&self) -> io::Result<()>;

    fn release(&self);

    /// `wMaxPacketSize` of the endpoint; sizes the poll loop's scratch buffer.
    fn max_packet_size(&self) -> usize;

    /// Platform device path, e.g. `/dev/bus/usb/001/004`.
    fn device_address(&self) -> String;

    fn product_name(&self) -> Option<String> {
        None
    }

    fn manufacturer_name(&self) -> Option<String> {
        None
    }
}
