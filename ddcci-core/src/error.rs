use std::path::PathBuf;
use thiserror::Error;

/// Main error type for DDC/CI operations
///
/// Variants cover the full range of failure modes on the monitor bus:
/// device nodes that cannot be opened, transport-level read/write errors,
/// malformed or corrupted protocol frames, and EDID blocks that do not
/// identify a monitor. Protocol failures are terminal for the transaction
/// that produced them; a corrupted response on this bus cannot be told
/// apart from a busy device, so nothing here is retried.
#[derive(Error, Debug)]
pub enum DdcError {
    /// The bus device node could not be opened.
    #[error("cannot open {}: {}", .path.display(), .reason)]
    OpenFailed { path: PathBuf, reason: String },

    /// No readable EDID at the given address; the device is not a monitor
    /// or the bus transaction failed.
    #[error("no EDID at 0x{addr:02x}: {reason}")]
    NoEdid { addr: u16, reason: String },

    /// The EDID block was read but its fixed header is wrong.
    #[error("corrupted EDID at 0x{0:02x}")]
    CorruptEdid(u16),

    /// Bus I/O failed while fetching the EDID block.
    #[error("reading EDID at 0x{addr:02x} failed: {reason}")]
    EdidReadFailed { addr: u16, reason: String },

    /// A raw bus write failed.
    #[error("bus write failed: {0}")]
    BusWrite(String),

    /// A raw bus read failed or returned nothing.
    #[error("bus read failed: {0}")]
    BusRead(String),

    /// Outgoing payload exceeds the protocol frame limit.
    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),

    /// Reply frame does not echo the expected device address.
    #[error("invalid response, first byte is 0x{got:02x}, should be 0x{expected:02x}")]
    AddressMismatch { got: u8, expected: u8 },

    /// Reply length byte is missing its marker bit.
    #[error("invalid response, length marker is 0x{0:02x}")]
    BadLengthMarker(u8),

    /// Reply declares more payload than the caller or the frame allows.
    #[error("invalid response, length is {len}, should be {max} at most")]
    LengthOverflow { len: usize, max: usize },

    /// Reply bytes do not xor to zero.
    #[error("invalid response, corrupted data - xor is 0x{0:02x}")]
    ChecksumMismatch(u8),

    /// Reply to a control read did not match the request.
    #[error("malformed reply to control read 0x{0:02x}")]
    ReadControlFailed(u8),

    /// Capability chunk did not echo the requested offset or opcode.
    #[error("invalid sequence in capability chunk at offset {0}")]
    CapsChunkMismatch(u16),

    /// Accumulated capability string would exceed the caller's buffer.
    #[error("buffer of {0} bytes too small to contain capabilities")]
    CapsBufferTooSmall(usize),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for DDC/CI operations
pub type DdcResult<T> = Result<T, DdcError>;
