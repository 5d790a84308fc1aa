//! Monitor connection lifecycle

use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};

use ddcci_core::{DdcConfig, DdcError, DdcResult};
use ddcci_protocol::channel::{
    COMMAND_PRESENCE, ControlValue, DEFAULT_DDCCI_ADDR, DEFAULT_EDID_ADDR, DdcChannel,
};
use ddcci_protocol::edid::EdidIdentity;
use ddcci_transport::{I2cBus, I2cDevBus};

use crate::handshake::{CTRL_VENDOR, HandshakeKind, VENDOR_DISABLE, VENDOR_ENABLE};
use crate::profile::{Profile, ProfileDatabase};

/// One open connection to one monitor.
///
/// A `Monitor` is either fully DDC/CI capable (the init handshake was
/// answered) or EDID-only: identity and input type stay valid, but control
/// transactions will fail. Exactly one `Monitor` exists per physical
/// device at a time; every operation takes `&mut self` and blocks, so a
/// connection belongs to one thread for its lifetime.
#[derive(Debug)]
pub struct Monitor<B: I2cBus> {
    channel: DdcChannel<B>,
    ident: EdidIdentity,
    profile: Option<Arc<Profile>>,
    handshake: HandshakeKind,
    ddcci: bool,
}

impl Monitor<I2cDevBus> {
    /// Open the monitor behind the bus device node at `path`, using the
    /// default DDC/CI and EDID addresses.
    pub fn open<P: AsRef<Path>>(
        path: P,
        db: &dyn ProfileDatabase,
        config: DdcConfig,
    ) -> DdcResult<Self> {
        Self::open_at(path, DEFAULT_DDCCI_ADDR, DEFAULT_EDID_ADDR, db, config)
    }

    /// Open with explicit DDC/CI and EDID addresses.
    pub fn open_at<P: AsRef<Path>>(
        path: P,
        addr: u16,
        edid_addr: u16,
        db: &dyn ProfileDatabase,
        config: DdcConfig,
    ) -> DdcResult<Self> {
        let bus = I2cDevBus::open(path)?;
        Self::open_with_bus(bus, addr, edid_addr, db, config)
    }
}

impl<B: I2cBus> Monitor<B> {
    /// Bring up a monitor over an already-open bus handle.
    ///
    /// # Process
    ///
    /// 1. Read and validate the EDID block; failure means this is not a
    ///    monitor and maps to `NoEdid`.
    /// 2. Look the identity up in the profile database.
    /// 3. Run the init handshake the profile (or the identity prefix)
    ///    calls for: the vendor enable write, or the presence check.
    ///
    /// A handshake failure downgrades the monitor to EDID-only instead of
    /// failing the open; a monitor that ignores the handshake can still
    /// report a correct identity. The bus handle is released before any
    /// error is returned.
    pub fn open_with_bus(
        bus: B,
        addr: u16,
        edid_addr: u16,
        db: &dyn ProfileDatabase,
        config: DdcConfig,
    ) -> DdcResult<Self> {
        let mut channel = DdcChannel::new(bus, addr, config);

        let ident = match channel.read_edid(edid_addr) {
            Ok(ident) => ident,
            Err(e) => {
                let reason = e.to_string();
                if let Err(close_err) = channel.close() {
                    warn!("closing bus after failed EDID read also failed: {close_err}");
                }
                return Err(DdcError::NoEdid {
                    addr: edid_addr,
                    reason,
                });
            }
        };

        let profile = db.lookup(&ident.pnp_id);
        let handshake = HandshakeKind::for_monitor(profile.as_deref(), &ident.pnp_id);

        let mut monitor = Self {
            channel,
            ident,
            profile,
            handshake,
            ddcci: false,
        };

        let greeted = match handshake {
            HandshakeKind::VendorEnable => {
                monitor.channel.write_control(CTRL_VENDOR, VENDOR_ENABLE)
            }
            HandshakeKind::PresenceCheck => monitor.channel.send_command(COMMAND_PRESENCE),
        };

        match greeted {
            Ok(()) => monitor.ddcci = true,
            Err(e) => {
                // Identity is still good; keep the connection usable for
                // read-only information.
                debug!(
                    "{}: handshake failed, monitor is EDID-only: {e}",
                    monitor.ident.pnp_id
                );
            }
        }

        Ok(monitor)
    }

    /// PNP identity from the EDID block, e.g. `"SAM0123"`.
    pub fn pnp_id(&self) -> &str {
        &self.ident.pnp_id
    }

    /// Full EDID identity.
    pub fn identity(&self) -> &EdidIdentity {
        &self.ident
    }

    /// The monitor input is digital.
    pub fn is_digital(&self) -> bool {
        self.ident.digital
    }

    /// Profile the database returned for this monitor, if any.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_deref()
    }

    /// Handshake kind resolved at open; close consults the same value.
    pub fn handshake(&self) -> HandshakeKind {
        self.handshake
    }

    /// The init handshake was answered and control transactions are
    /// expected to work.
    pub fn is_ddcci_active(&self) -> bool {
        self.ddcci
    }

    /// Display name: the profile's, or a label built from the identity.
    pub fn display_name(&self) -> String {
        match &self.profile {
            Some(profile) => profile.name.clone(),
            None => format!("Unknown monitor ({})", self.ident.pnp_id),
        }
    }

    /// Read a control register.
    pub fn get_control(&mut self, ctrl: u8) -> DdcResult<ControlValue> {
        self.channel.read_control(ctrl)
    }

    /// Write a control register.
    pub fn set_control(&mut self, ctrl: u8, value: u16) -> DdcResult<()> {
        self.channel.write_control(ctrl, value)
    }

    /// Ask the monitor to persist its current settings.
    pub fn save_settings(&mut self) -> DdcResult<()> {
        self.channel.save_settings()
    }

    /// Fetch the capability string, bounded by `max_output` bytes.
    pub fn capabilities(&mut self, max_output: usize) -> DdcResult<Vec<u8>> {
        self.channel.read_capabilities(max_output)
    }

    /// Direct access to the underlying command channel.
    pub fn channel_mut(&mut self) -> &mut DdcChannel<B> {
        &mut self.channel
    }

    /// Tear the connection down.
    ///
    /// Monitors opened with the vendor enable get the symmetric disable
    /// write first; its failure is logged and does not block the close.
    /// The profile reference is released, and the bus handle is closed;
    /// a failure there is the only fatal teardown error.
    pub fn close(mut self) -> DdcResult<()> {
        if self.handshake == HandshakeKind::VendorEnable {
            if let Err(e) = self.channel.write_control(CTRL_VENDOR, VENDOR_DISABLE) {
                warn!("{}: vendor disable failed: {e}", self.ident.pnp_id);
            }
        }

        drop(self.profile.take());
        self.channel.close()
    }
}
