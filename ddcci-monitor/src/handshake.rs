//! Vendor handshake selection
//!
//! Some monitors answer DDC/CI only after a private wake-up write to a
//! vendor register; the rest get the standard presence check. The decision
//! is made once and consumed symmetrically by open and close.

use crate::profile::Profile;

/// Vendor protocol-enable control register.
pub const CTRL_VENDOR: u8 = 0xf5;
/// Value enabling the vendor protocol extension.
pub const VENDOR_ENABLE: u16 = 0x0001;
/// Value disabling the vendor protocol extension.
pub const VENDOR_DISABLE: u16 = 0x0000;

/// How a monitor is woken up at open and released at close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeKind {
    /// Write the vendor enable register on open, disable it on close.
    VendorEnable,
    /// Send the ACCESS.bus presence check on open; nothing on close.
    PresenceCheck,
}

impl HandshakeKind {
    /// Decide the handshake for a monitor.
    ///
    /// A profile settles it. Without one, monitors identifying as Samsung
    /// get the vendor enable; everything else gets the presence check.
    pub fn for_monitor(profile: Option<&Profile>, pnp_id: &str) -> Self {
        match profile {
            Some(profile) => profile.init,
            None if pnp_id.starts_with("SAM") => HandshakeKind::VendorEnable,
            None => HandshakeKind::PresenceCheck,
        }
    }
}
