//! DDC/CI frame encoding and validation
//!
//! One frame is one exchange unit on the bus. A request is
//! `[0x51, 0x80 | len, payload.., checksum]`; a reply is validated against
//! `[addr * 2, 0x80 | len, payload.., checksum]`. The checksum is a running
//! xor over every transmitted byte, seeded with `address << 1` on send and
//! with [`RECV_XOR_SEED`] on receive. The seeds differ because the host and
//! the device occupy different roles on the bus; both values are part of
//! the wire format and must not be unified.

use ddcci_core::{DdcError, DdcResult};

/// Maximum payload length of one frame.
pub const MAX_PAYLOAD: usize = 127;
/// Framing bytes around a payload: address echo, length byte, checksum.
pub const FRAME_OVERHEAD: usize = 3;

/// First byte of every outgoing frame, the host source address.
pub const HOST_ADDRESS: u8 = 0x51;
/// Marker bit ored into the length byte.
pub const LENGTH_MARK: u8 = 0x80;
/// Checksum seed for received frames.
pub const RECV_XOR_SEED: u8 = 0x50;

/// Running xor checksum over frame bytes.
#[derive(Debug, Clone)]
pub struct XorCheck {
    value: u8,
}

impl XorCheck {
    /// Create an accumulator starting from `seed`.
    pub fn new(seed: u8) -> Self {
        Self { value: seed }
    }

    /// Fold a single byte into the checksum.
    pub fn update(&mut self, byte: u8) {
        self.value ^= byte;
    }

    /// Fold a slice of bytes into the checksum.
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.update(byte);
        }
    }

    /// Current checksum value.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// A fully folded valid frame leaves a zero residue.
    pub fn validate(&self) -> DdcResult<()> {
        if self.value != 0 {
            Err(DdcError::ChecksumMismatch(self.value))
        } else {
            Ok(())
        }
    }
}

/// Encode `payload` into a request frame for the device at `address`.
///
/// # Errors
///
/// `PayloadTooLarge` if the payload exceeds [`MAX_PAYLOAD`] bytes.
pub fn encode(address: u16, payload: &[u8]) -> DdcResult<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD {
        return Err(DdcError::PayloadTooLarge(payload.len()));
    }

    let mut frame = Vec::with_capacity(payload.len() + FRAME_OVERHEAD);
    frame.push(HOST_ADDRESS);
    frame.push(LENGTH_MARK | payload.len() as u8);
    frame.extend_from_slice(payload);

    let mut check = XorCheck::new((address as u8) << 1);
    check.update_bytes(&frame);
    frame.push(check.value());

    Ok(frame)
}

/// Validate a reply frame from the device at `address` and extract its
/// payload.
///
/// `raw` must hold at least [`FRAME_OVERHEAD`] bytes; the declared payload
/// length may not exceed `expected_max_len`. Validation order: address
/// echo, length marker bit, length bounds, checksum residue. Every failure
/// is terminal for the transaction; a corrupted reply cannot be told apart
/// from a busy bus, and a blind retry risks desynchronizing the device.
pub fn decode(address: u16, raw: &[u8], expected_max_len: usize) -> DdcResult<Vec<u8>> {
    debug_assert!(raw.len() >= FRAME_OVERHEAD);

    let expected = (address as u8) << 1;
    if raw[0] != expected {
        return Err(DdcError::AddressMismatch {
            got: raw[0],
            expected,
        });
    }

    if raw[1] & LENGTH_MARK == 0 {
        return Err(DdcError::BadLengthMarker(raw[1]));
    }

    let len = (raw[1] & !LENGTH_MARK) as usize;
    if len > expected_max_len || len + FRAME_OVERHEAD > raw.len() {
        return Err(DdcError::LengthOverflow {
            len,
            max: expected_max_len,
        });
    }

    let mut check = XorCheck::new(RECV_XOR_SEED);
    check.update_bytes(&raw[..len + FRAME_OVERHEAD]);
    check.validate()?;

    Ok(raw[2..2 + len].to_vec())
}

/// Render bytes as a spaced hex string for trace output.
pub fn hexdump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a receive-form frame the way a monitor would, for tests that
/// script the device side of an exchange.
#[cfg(test)]
pub(crate) fn reply_frame(address: u16, payload: &[u8]) -> Vec<u8> {
    let mut raw = Vec::with_capacity(payload.len() + FRAME_OVERHEAD);
    raw.push((address as u8) << 1);
    raw.push(LENGTH_MARK | payload.len() as u8);
    raw.extend_from_slice(payload);

    let mut check = XorCheck::new(RECV_XOR_SEED);
    check.update_bytes(&raw);
    raw.push(check.value());

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn xor_check_folds_seed_and_bytes() {
        let mut check = XorCheck::new(0x50);
        check.update(0x6e);
        check.update_bytes(&[0x81, 0x02, 0x6e ^ 0x50 ^ 0x81 ^ 0x02]);
        assert_eq!(check.value(), 0);
        assert!(check.validate().is_ok());
    }

    #[test]
    fn xor_check_reports_nonzero_residue() {
        let mut check = XorCheck::new(0x50);
        check.update(0x6f);
        assert!(matches!(
            check.validate(),
            Err(DdcError::ChecksumMismatch(0x3f))
        ));
    }

    #[test]
    fn encode_layout_is_bit_exact() {
        // 0x6e ^ 0x51 ^ 0x84 ^ 0x03 ^ 0x10 ^ 0x00 ^ 0x2d == 0x85
        let frame = encode(0x37, &[0x03, 0x10, 0x00, 0x2d]).unwrap();
        assert_eq!(frame, vec![0x51, 0x84, 0x03, 0x10, 0x00, 0x2d, 0x85]);
    }

    #[test]
    fn encode_rejects_oversized_payload() {
        let payload = vec![0u8; MAX_PAYLOAD + 1];
        assert!(matches!(
            encode(0x37, &payload),
            Err(DdcError::PayloadTooLarge(128))
        ));
    }

    #[test]
    fn reply_round_trips_for_every_length() {
        for len in 0..=124usize {
            let payload: Vec<u8> = (0..len).map(|i| (i * 7 + len) as u8).collect();
            let raw = reply_frame(0x37, &payload);
            let decoded = decode(0x37, &raw, 124).unwrap();
            assert_eq!(decoded, payload, "payload length {len}");
        }
    }

    #[test]
    fn corruption_in_checksummed_body_is_always_caught() {
        let mut rng = StdRng::seed_from_u64(0x5144_4343);
        for _ in 0..200 {
            let len = rng.gen_range(0..=124usize);
            let payload: Vec<u8> = (0..len).map(|_| rng.r#gen()).collect();
            let mut raw = reply_frame(0x37, &payload);

            // Flip one bit anywhere past the header: payload or checksum.
            let pos = rng.gen_range(2..raw.len());
            let bit = 1u8 << rng.gen_range(0..8);
            raw[pos] ^= bit;

            assert!(
                matches!(
                    decode(0x37, &raw, 124),
                    Err(DdcError::ChecksumMismatch(_))
                ),
                "flip of bit {bit:#04x} at {pos} went undetected (len {len})"
            );
        }
    }

    #[test]
    fn address_mismatch_is_rejected_first() {
        let mut raw = reply_frame(0x37, &[0x02, 0x00, 0x10]);
        raw[0] ^= 0x04;
        assert!(matches!(
            decode(0x37, &raw, 124),
            Err(DdcError::AddressMismatch {
                expected: 0x6e,
                ..
            })
        ));
    }

    #[test]
    fn reply_for_another_address_is_rejected() {
        let raw = reply_frame(0x3a, &[0x02, 0x00, 0x10]);
        assert!(matches!(
            decode(0x37, &raw, 124),
            Err(DdcError::AddressMismatch { .. })
        ));
    }

    #[test]
    fn missing_length_marker_is_rejected() {
        let mut raw = reply_frame(0x37, &[0x02, 0x00, 0x10]);
        raw[1] &= !LENGTH_MARK;
        assert!(matches!(
            decode(0x37, &raw, 124),
            Err(DdcError::BadLengthMarker(0x03))
        ));
    }

    #[test]
    fn declared_length_beyond_limit_is_rejected() {
        let raw = reply_frame(0x37, &[0u8; 10]);
        assert!(matches!(
            decode(0x37, &raw, 5),
            Err(DdcError::LengthOverflow { len: 10, max: 5 })
        ));
    }

    #[test]
    fn declared_length_beyond_buffer_is_rejected() {
        let mut raw = reply_frame(0x37, &[0x01, 0x02]);
        // Claim more payload than the buffer holds.
        raw[1] = LENGTH_MARK | 0x10;
        assert!(matches!(
            decode(0x37, &raw, 124),
            Err(DdcError::LengthOverflow { len: 16, .. })
        ));
    }

    #[test]
    fn hexdump_formats_spaced_bytes() {
        assert_eq!(hexdump(&[0x51, 0x84, 0x00]), "51 84 00");
    }
}
