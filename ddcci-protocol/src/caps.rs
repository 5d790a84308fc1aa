//! Chunked capability-string retrieval
//!
//! A monitor's capability string does not fit in one frame; it is fetched
//! in chunks tagged with the offset they start at, and the reader keeps a
//! running offset that every chunk must echo.

use ddcci_core::{DdcError, DdcResult};
use ddcci_transport::I2cBus;

use crate::channel::DdcChannel;

/// Frame-payload ceiling of one capability chunk reply.
pub const CAPS_CHUNK: usize = 35;

/// Chunk content at or below this length ends the sequence.
const LAST_CHUNK_CONTENT: usize = 2;

impl<B: I2cBus> DdcChannel<B> {
    /// Assemble the monitor's capability string across chunked reads.
    ///
    /// The offset advances by each chunk's content length; a chunk with
    /// two or fewer content bytes is appended and ends the sequence. The
    /// assembled text is null-terminated and must fit in `max_output`
    /// bytes including the terminator.
    ///
    /// # Errors
    ///
    /// `CapsBufferTooSmall` when the accumulated string would exceed
    /// `max_output`; chunk transaction errors propagate unchanged.
    pub fn read_capabilities(&mut self, max_output: usize) -> DdcResult<Vec<u8>> {
        let mut out = Vec::new();
        let mut offset: u16 = 0;

        loop {
            let content = self.read_caps_chunk(offset)?;

            if out.len() + content.len() + 1 > max_output {
                return Err(DdcError::CapsBufferTooSmall(max_output));
            }
            out.extend_from_slice(&content);
            offset += content.len() as u16;

            if content.len() <= LAST_CHUNK_CONTENT {
                break;
            }
        }

        out.push(0);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{COMMAND_CAPS, DEFAULT_DDCCI_ADDR, REPLY_CAPS};
    use crate::frame::{self, reply_frame};
    use ddcci_core::DdcConfig;
    use ddcci_transport::{BusOp, MockBus};

    fn caps_request(offset: u16) -> BusOp {
        let [hi, lo] = offset.to_be_bytes();
        BusOp::Write {
            addr: DEFAULT_DDCCI_ADDR,
            expect: frame::encode(DEFAULT_DDCCI_ADDR, &[COMMAND_CAPS, hi, lo]).unwrap(),
        }
    }

    fn caps_chunk(offset: u16, content: &[u8]) -> BusOp {
        let [hi, lo] = offset.to_be_bytes();
        let mut payload = vec![REPLY_CAPS, hi, lo];
        payload.extend_from_slice(content);
        BusOp::Read {
            addr: DEFAULT_DDCCI_ADDR,
            reply: reply_frame(DEFAULT_DDCCI_ADDR, &payload),
        }
    }

    fn channel(script: Vec<BusOp>) -> (DdcChannel<MockBus>, MockBus) {
        let bus = MockBus::new(script);
        let probe = bus.clone();
        (
            DdcChannel::new(bus, DEFAULT_DDCCI_ADDR, DdcConfig::default()),
            probe,
        )
    }

    #[test]
    fn chunks_are_assembled_in_order_until_a_short_one() {
        let first: Vec<u8> = b"(prot(monitor)type(lcd)model(".to_vec();
        let first = {
            let mut v = first;
            v.resize(32, b'x');
            v
        };
        let second = vec![b'y'; 32];
        let last = vec![b')'];

        let (mut chan, probe) = channel(vec![
            caps_request(0),
            caps_chunk(0, &first),
            caps_request(32),
            caps_chunk(32, &second),
            caps_request(64),
            caps_chunk(64, &last),
        ]);

        let caps = chan.read_capabilities(1024).unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&first);
        expected.extend_from_slice(&second);
        expected.extend_from_slice(&last);
        expected.push(0);
        assert_eq!(caps, expected);
        assert!(probe.is_exhausted());
    }

    #[test]
    fn empty_final_chunk_terminates_too() {
        let content = vec![b'z'; 16];
        let (mut chan, probe) = channel(vec![
            caps_request(0),
            caps_chunk(0, &content),
            caps_request(16),
            caps_chunk(16, &[]),
        ]);

        let caps = chan.read_capabilities(1024).unwrap();
        assert_eq!(caps.len(), 17);
        assert_eq!(caps[16], 0);
        assert!(probe.is_exhausted());
    }

    #[test]
    fn overflowing_the_output_buffer_is_an_error() {
        let content = vec![b'z'; 32];
        let (mut chan, _) = channel(vec![caps_request(0), caps_chunk(0, &content)]);

        assert!(matches!(
            chan.read_capabilities(16),
            Err(DdcError::CapsBufferTooSmall(16))
        ));
    }

    #[test]
    fn output_exactly_filling_the_buffer_is_accepted() {
        let content = vec![b'z'; 2];
        let (mut chan, _) = channel(vec![caps_request(0), caps_chunk(0, &content)]);

        // Two content bytes plus the terminator fit a 3-byte buffer.
        let caps = chan.read_capabilities(3).unwrap();
        assert_eq!(caps, vec![b'z', b'z', 0]);
    }

    #[test]
    fn offset_echo_mismatch_aborts_the_sequence() {
        let (mut chan, _) = channel(vec![caps_request(0), caps_chunk(8, &[b'a'; 16])]);

        assert!(matches!(
            chan.read_capabilities(1024),
            Err(DdcError::CapsChunkMismatch(0))
        ));
    }

    #[test]
    fn chunk_errors_propagate_unchanged() {
        let (mut chan, _) = channel(vec![
            caps_request(0),
            BusOp::FailRead {
                addr: DEFAULT_DDCCI_ADDR,
            },
        ]);

        assert!(matches!(
            chan.read_capabilities(1024),
            Err(DdcError::BusRead(_))
        ));
    }
}
