//! EDID base-block parsing and identity extraction
//!
//! Only the 128-byte base block is handled, enough to identify a monitor;
//! extension blocks and the version-specific checksum tables are out of
//! scope.

use ddcci_core::{DdcError, DdcResult};

/// Size of the EDID base block.
pub const EDID_LENGTH: usize = 128;

/// Fixed header opening every EDID block.
pub const EDID_HEADER: [u8; 8] = [0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00];

/// Identity extracted from an EDID base block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdidIdentity {
    /// PNP id: three manufacturer letters followed by four product-code
    /// hex digits, e.g. `"SAM0123"`.
    pub pnp_id: String,
    /// The input is digital (bit 7 of the video input definition byte).
    pub digital: bool,
}

/// Validate `raw` as an EDID base block and extract the identity.
///
/// `addr` labels the error when the block is rejected.
///
/// The manufacturer id packs three 5-bit letters big-endian into bytes
/// 8-9, each biased by `'A' - 1`; the product code sits little-endian in
/// bytes 10-11 and is rendered high byte first.
pub fn parse(raw: &[u8; EDID_LENGTH], addr: u16) -> DdcResult<EdidIdentity> {
    if raw[..8] != EDID_HEADER {
        return Err(DdcError::CorruptEdid(addr));
    }

    let m1 = ((raw[8] >> 2) & 0x1f) + b'A' - 1;
    let m2 = ((raw[8] & 0x03) << 3) + (raw[9] >> 5) + b'A' - 1;
    let m3 = (raw[9] & 0x1f) + b'A' - 1;

    let pnp_id = format!(
        "{}{}{}{:02X}{:02X}",
        m1 as char, m2 as char, m3 as char, raw[11], raw[10]
    );

    Ok(EdidIdentity {
        pnp_id,
        digital: raw[20] & 0x80 != 0,
    })
}
