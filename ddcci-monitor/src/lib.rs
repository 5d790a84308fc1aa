//! Monitor connection lifecycle and bus enumeration
//!
//! This crate ties the protocol engine to actual monitors: opening a bus
//! device node, reading the identity, running the vendor init handshake,
//! the symmetric teardown, and scanning `/dev` for candidate buses.

pub mod handshake;
pub mod monitor;
pub mod probe;
pub mod profile;

pub use handshake::{CTRL_VENDOR, HandshakeKind, VENDOR_DISABLE, VENDOR_ENABLE};
pub use monitor::Monitor;
pub use probe::{DiscoveryEntry, probe, probe_dir};
pub use profile::{EmptyDatabase, Profile, ProfileDatabase};
