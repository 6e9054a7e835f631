//! End-to-end tests through the umbrella crate.

use usbmidi::prelude::*;
use usbmidi::MidiMsg;

/// A short capture from a two-port interface: clock, a chord on cable 0, a pitch bend
/// on cable 1, a GM reset SysEx split over two packets, then a note off.
const CAPTURE: &[u8] = &[
    0x0F, 0xF8, 0x00, 0x00, // clock
    0x09, 0x90, 60, 100, // note on C4
    0x09, 0x90, 64, 100, // note on E4
    0x1E, 0xE1, 0x00, 0x40, // pitch bend center, cable 1
    0x04, 0xF0, 0x7E, 0x7F, // SysEx start
    0x07, 0x09, 0x01, 0xF7, // SysEx end, three bytes
    0x09, 0x90, 60, 0, // note off C4 via velocity 0
];

#[test]
fn test_replay_capture() {
    let (collector, events) = input_event_channel();
    let mut decoder = StreamDecoder::default();

    // Endpoint-sized reads that do not line up with packet boundaries.
    for chunk in CAPTURE.chunks(6) {
        decoder.push(chunk, Some(&collector));
    }

    let events = events.drain_all();
    let cable1 = Cable::new(1).unwrap();
    assert_eq!(
        events,
        vec![
            UsbMidiEvent::SingleByte { cable: Cable::default(), byte: 0xF8 },
            UsbMidiEvent::NoteOn { cable: Cable::default(), channel: 0, note: 60, velocity: 100 },
            UsbMidiEvent::NoteOn { cable: Cable::default(), channel: 0, note: 64, velocity: 100 },
            UsbMidiEvent::PitchWheel { cable: cable1, channel: 1, amount: 0x2000 },
            UsbMidiEvent::SystemExclusive {
                cable: Cable::default(),
                data: vec![0xF0, 0x7E, 0x7F, 0x09, 0x01, 0xF7],
            },
            UsbMidiEvent::NoteOff { cable: Cable::default(), channel: 0, note: 60, velocity: 0 },
        ]
    );

    // Channel voice events convert to midi-msg; the rest do not.
    let converted: Vec<MidiMsg> = events.iter().filter_map(UsbMidiEvent::to_midi_msg).collect();
    assert_eq!(converted.len(), 4);
    assert!(events[0].to_midi_msg().is_none());
}

#[cfg(feature = "io")]
mod device {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver};
    use std::io;
    use std::sync::Arc;
    use std::time::Duration;

    struct ChannelEndpoint(Receiver<Vec<u8>>);

    impl UsbEndpoint for ChannelEndpoint {
        fn read(&self, buf: &mut [u8], timeout: Duration) -> io::Result<usize> {
            match self.0.recv_timeout(timeout) {
                Ok(chunk) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    Ok(n)
                }
                Err(_) => Ok(0),
            }
        }

        fn claim(&self) -> io::Result<()> {
            Ok(())
        }

        fn release(&self) {}

        fn max_packet_size(&self) -> usize {
            64
        }

        fn device_address(&self) -> String {
            "/dev/bus/usb/003/007".into()
        }
    }

    /// The capture streamed through a polling device yields the same events as replay.
    #[test]
    fn test_device_matches_replay() {
        let (expected_collector, expected) = input_event_channel();
        StreamDecoder::default().push(CAPTURE, Some(&expected_collector));
        let expected = expected.drain_all();

        let (tx, rx) = unbounded();
        let (collector, events) = input_event_channel();
        let device = MidiInputDevice::builder(Arc::new(ChannelEndpoint(rx)))
            .config(InputConfig {
                elevated_priority: false,
                ..Default::default()
            })
            .listener(Arc::new(collector))
            .open()
            .unwrap();

        for chunk in CAPTURE.chunks(10) {
            tx.send(chunk.to_vec()).unwrap();
        }

        let mut received = Vec::new();
        while received.len() < expected.len() {
            match events.recv_timeout(Duration::from_secs(2)) {
                Some(event) => received.push(event),
                None => break,
            }
        }
        device.stop();

        assert_eq!(received, expected);
        assert_eq!(device.state(), usbmidi::DeviceState::Stopped);
    }

    #[test]
    fn test_device_errors_convert_to_umbrella() {
        fn open_with_bad_config() -> usbmidi::Result<MidiInputDevice> {
            let (_tx, rx) = unbounded();
            let config = InputConfig {
                suspend_wait: Duration::ZERO,
                ..Default::default()
            };
            Ok(MidiInputDevice::open(Arc::new(ChannelEndpoint(rx)), config)?)
        }

        assert!(matches!(
            open_with_bad_config(),
            Err(usbmidi::Error::Device(usbmidi::io::Error::InvalidConfig(_)))
        ));
    }
}
