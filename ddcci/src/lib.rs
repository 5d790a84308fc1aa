//! DDC/CI monitor control over I2C
//!
//! This library implements the DDC/CI command/response protocol used to
//! query and change display-monitor settings (brightness, contrast, power
//! mode, vendor registers) and to read a monitor's EDID identity.
//!
//! # Architecture
//!
//! The library is organized as a workspace with multiple crates:
//!
//! - `ddcci-core`: Error taxonomy and engine configuration
//! - `ddcci-transport`: Raw I2C bus primitive (`/dev/i2c-N`, mock)
//! - `ddcci-protocol`: Frame codec, command timing, transaction engine,
//!   capability retrieval, EDID parsing
//! - `ddcci-monitor`: Connection lifecycle, vendor handshakes, profile
//!   database seam, bus enumeration
//!
//! # Example
//!
//! ```rust,no_run
//! use ddcci::{CTRL_BRIGHTNESS, DdcConfig, EmptyDatabase, Monitor};
//!
//! fn main() -> ddcci::DdcResult<()> {
//!     let mut monitor = Monitor::open("/dev/i2c-1", &EmptyDatabase, DdcConfig::default())?;
//!     println!("monitor: {}", monitor.display_name());
//!
//!     if monitor.is_ddcci_active() {
//!         let brightness = monitor.get_control(CTRL_BRIGHTNESS)?;
//!         println!("brightness {}/{}", brightness.value, brightness.maximum);
//!         monitor.set_control(CTRL_BRIGHTNESS, brightness.maximum / 2)?;
//!     }
//!
//!     monitor.close()
//! }
//! ```
//!
//! All operations are synchronous and blocking: the bus is exclusive and
//! half-duplex, and the protocol demands a quiet interval after every
//! write. Monitors on different bus nodes are independent and may be
//! driven from different threads, one connection per thread.

// Re-export core types
pub use ddcci_core::{DdcConfig, DdcError, DdcResult, Verbosity};

pub use ddcci_transport::{BusOp, I2cBus, I2cDevBus, MockBus};

pub use ddcci_protocol::{
    CAPS_CHUNK, COMMAND_CAPS, COMMAND_PRESENCE, COMMAND_READ, COMMAND_SAVE, COMMAND_WRITE,
    CTRL_BRIGHTNESS, ControlValue, DEFAULT_DDCCI_ADDR, DEFAULT_EDID_ADDR, DdcChannel, EDID_HEADER,
    EDID_LENGTH, EdidIdentity, FRAME_OVERHEAD, MAX_PAYLOAD, QUIESCENCE, QuiescenceTimer, REPLY_CAPS,
    REPLY_READ, XorCheck,
};

pub use ddcci_monitor::{
    CTRL_VENDOR, DiscoveryEntry, EmptyDatabase, HandshakeKind, Monitor, Profile, ProfileDatabase,
    VENDOR_DISABLE, VENDOR_ENABLE, probe, probe_dir,
};

// Re-export the monitor API
pub mod monitor {
    pub use ddcci_monitor::*;
}

// Re-export the protocol engine
pub mod protocol {
    pub use ddcci_protocol::*;
}

// Re-export the bus transport
pub mod transport {
    pub use ddcci_transport::*;
}
