//! Frame alignment for the raw bulk-IN byte stream.
//!
//! Transfers on a MIDI streaming endpoint are supposed to be whole packets, but a read
//! may still stop mid-packet. Trailing bytes are carried into the next call so packet
//! boundaries survive arbitrary chunking.

use crate::packet::{UsbMidiPacket, PACKET_SIZE};

#[derive(Debug, Default)]
pub struct PacketReassembler {
    buffer: Vec<u8>,
}

impl PacketReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// `capacity` should cover the largest read plus a 3-byte carry-over.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity.max(PACKET_SIZE)),
        }
    }

    /// Appends `chunk` and hands every complete packet to `on_packet`, in arrival order.
    ///
    /// Returns the number of packets emitted. At most 3 bytes remain buffered afterwards.
    pub fn push<F>(&mut self, chunk: &[u8], mut on_packet: F) -> usize
    where
        F: FnMut(UsbMidiPacket),
    {
        self.buffer.extend_from_slice(chunk);

        let aligned = self.buffer.len() / PACKET_SIZE * PACKET_SIZE;
        if aligned == 0 {
            return 0;
        }

        for raw in self.buffer[..aligned].chunks_exact(PACKET_SIZE) {
            on_packet(UsbMidiPacket::from_bytes([raw[0], raw[1], raw[2], raw[3]]));
        }
        self.buffer.drain(..aligned);

        aligned / PACKET_SIZE
    }

    /// Bytes waiting for the rest of their packet.
    pub fn carry_over(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(reassembler: &mut PacketReassembler, chunk: &[u8]) -> Vec<[u8; 4]> {
        let mut packets = Vec::new();
        reassembler.push(chunk, |p| packets.push(*p.as_bytes()));
        packets
    }

    #[test]
    fn test_whole_packets_pass_through() {
        let mut r = PacketReassembler::new();
        let packets = collect(&mut r, &[0x09, 0x90, 60, 100, 0x08, 0x80, 60, 0]);
        assert_eq!(packets, vec![[0x09, 0x90, 60, 100], [0x08, 0x80, 60, 0]]);
        assert!(r.carry_over().is_empty());
    }

    #[test]
    fn test_fewer_than_four_bytes_emit_nothing() {
        let mut r = PacketReassembler::new();
        assert!(collect(&mut r, &[0x09]).is_empty());
        assert!(collect(&mut r, &[0x90, 60]).is_empty());
        assert_eq!(r.carry_over(), &[0x09, 0x90, 60]);

        let packets = collect(&mut r, &[100]);
        assert_eq!(packets, vec![[0x09, 0x90, 60, 100]]);
        assert!(r.carry_over().is_empty());
    }

    #[test]
    fn test_any_split_point_yields_same_packets() {
        let stream: Vec<u8> = (0u8..23).collect();
        let expected = stream.len() / 4;

        for split in 0..=stream.len() {
            let mut r = PacketReassembler::with_capacity(64);
            let mut count = r.push(&stream[..split], |_| {});
            count += r.push(&stream[split..], |_| {});
            assert_eq!(count, expected, "split at {}", split);
            assert_eq!(r.carry_over(), &stream[expected * 4..]);
        }
    }

    #[test]
    fn test_byte_at_a_time() {
        let stream: Vec<u8> = (0u8..16).collect();
        let mut r = PacketReassembler::new();
        let mut packets = Vec::new();
        for byte in &stream {
            r.push(std::slice::from_ref(byte), |p| packets.push(*p.as_bytes()));
        }
        let flat: Vec<u8> = packets.concat();
        assert_eq!(flat, stream);
    }

    #[test]
    fn test_clear_drops_partial_packet() {
        let mut r = PacketReassembler::new();
        collect(&mut r, &[0x0B, 0xB0]);
        r.clear();
        assert_eq!(collect(&mut r, &[0x0F, 0xF8, 0, 0]), vec![[0x0F, 0xF8, 0, 0]]);
    }
}
