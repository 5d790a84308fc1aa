//! Protocol engine for DDC/CI monitor control
//!
//! This crate implements the command/response protocol a monitor speaks on
//! its I2C bus: frame encoding and validation, the mandatory quiet interval
//! between commands, control-register transactions, chunked capability
//! retrieval, and EDID identity extraction.
//!
//! The engine is synchronous and blocking. The physical bus is exclusive
//! and half-duplex; nothing is gained by overlapping operations on one
//! connection, and the quiet intervals are real sleeps.

pub mod caps;
pub mod channel;
pub mod edid;
pub mod frame;
pub mod timing;

pub use caps::CAPS_CHUNK;
pub use channel::{
    COMMAND_CAPS, COMMAND_PRESENCE, COMMAND_READ, COMMAND_SAVE, COMMAND_WRITE, CTRL_BRIGHTNESS,
    ControlValue, DEFAULT_DDCCI_ADDR, DEFAULT_EDID_ADDR, DdcChannel, REPLY_CAPS, REPLY_READ,
};
pub use edid::{EDID_HEADER, EDID_LENGTH, EdidIdentity};
pub use frame::{FRAME_OVERHEAD, MAX_PAYLOAD, XorCheck};
pub use timing::{QUIESCENCE, QuiescenceTimer};
