//! DDC/CI transaction engine
//!
//! [`DdcChannel`] sequences write-then-read exchanges against a monitor's
//! DDC/CI address: quiesce, encode, write, quiesce, read, decode. Transport
//! and protocol failures are surfaced to the caller unmodified and never
//! retried; on this bus a corrupted reply is indistinguishable from a busy
//! device, and a blind retry can desynchronize the exchange.

use log::{debug, trace};

use ddcci_core::{DdcConfig, DdcError, DdcResult, Verbosity};
use ddcci_transport::I2cBus;

use crate::caps::CAPS_CHUNK;
use crate::edid::{self, EDID_LENGTH, EdidIdentity};
use crate::frame::{self, FRAME_OVERHEAD};
use crate::timing::QuiescenceTimer;

/// Default bus address of the DDC/CI logic in a monitor.
pub const DEFAULT_DDCCI_ADDR: u16 = 0x37;
/// Default bus address of the EDID EEPROM.
pub const DEFAULT_EDID_ADDR: u16 = 0x50;

/// Read a control register.
pub const COMMAND_READ: u8 = 0x01;
/// Reply to a control read.
pub const REPLY_READ: u8 = 0x02;
/// Write a control register.
pub const COMMAND_WRITE: u8 = 0x03;
/// Save current settings to monitor memory.
pub const COMMAND_SAVE: u8 = 0x0c;
/// Reply to a capabilities request.
pub const REPLY_CAPS: u8 = 0xe3;
/// Request a capabilities chunk.
pub const COMMAND_CAPS: u8 = 0xf3;
/// ACCESS.bus presence check.
pub const COMMAND_PRESENCE: u8 = 0xf7;

/// Brightness control register.
pub const CTRL_BRIGHTNESS: u8 = 0x10;

/// Result of reading a control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlValue {
    /// The monitor did not flag the register as unsupported.
    pub supported: bool,
    /// Current register value.
    pub value: u16,
    /// Maximum the register accepts.
    pub maximum: u16,
}

/// One command channel to a monitor's DDC/CI address.
///
/// Owns the bus handle and the per-connection quiescence timer. All
/// operations take `&mut self` and block; a channel belongs to exactly one
/// thread for its lifetime.
#[derive(Debug)]
pub struct DdcChannel<B: I2cBus> {
    bus: B,
    address: u16,
    timer: QuiescenceTimer,
    config: DdcConfig,
}

impl<B: I2cBus> DdcChannel<B> {
    /// Wrap `bus` into a channel targeting the device at `address`.
    pub fn new(bus: B, address: u16, config: DdcConfig) -> Self {
        Self {
            bus,
            address,
            timer: QuiescenceTimer::new(),
            config,
        }
    }

    /// Target DDC/CI address of this channel.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Configuration the channel was built with.
    pub fn config(&self) -> &DdcConfig {
        &self.config
    }

    /// Encode `payload` and write it to the device as one frame.
    pub fn write_frame(&mut self, payload: &[u8]) -> DdcResult<()> {
        if self.config.verbosity >= Verbosity::Data {
            debug!("send: {}", frame::hexdump(payload));
        }

        let encoded = frame::encode(self.address, payload)?;
        if self.config.verbosity >= Verbosity::Frames {
            trace!("send frame: {}", frame::hexdump(&encoded));
        }

        self.timer.wait_and_mark(true);
        let written = self.bus.write(self.address, &encoded)?;
        if written != encoded.len() {
            return Err(DdcError::BusWrite(format!(
                "short write: {} of {} bytes",
                written,
                encoded.len()
            )));
        }
        Ok(())
    }

    /// Read one reply frame carrying at most `max_len` payload bytes.
    pub fn read_frame(&mut self, max_len: usize) -> DdcResult<Vec<u8>> {
        self.timer.wait_and_mark(false);

        let mut raw = vec![0u8; max_len + FRAME_OVERHEAD];
        let n = self.bus.read(self.address, &mut raw)?;
        if n < FRAME_OVERHEAD {
            return Err(DdcError::BusRead(format!("short reply: {n} bytes")));
        }

        if self.config.verbosity >= Verbosity::Frames {
            trace!("recv frame: {}", frame::hexdump(&raw[..n]));
        }

        let payload = frame::decode(self.address, &raw[..n], max_len)?;
        if self.config.verbosity >= Verbosity::Data {
            debug!("recv: {}", frame::hexdump(&payload));
        }
        Ok(payload)
    }

    /// Write `value` to control register `ctrl`. No reply is expected.
    pub fn write_control(&mut self, ctrl: u8, value: u16) -> DdcResult<()> {
        let [hi, lo] = value.to_be_bytes();
        self.write_frame(&[COMMAND_WRITE, ctrl, hi, lo])
    }

    /// Read control register `ctrl`.
    ///
    /// The 8-byte reply must carry the read-reply opcode and echo the
    /// requested register; any mismatch is reported, never guessed at.
    pub fn read_control(&mut self, ctrl: u8) -> DdcResult<ControlValue> {
        self.write_frame(&[COMMAND_READ, ctrl])?;
        let reply = self.read_frame(8)?;

        if reply.len() != 8 || reply[0] != REPLY_READ || reply[2] != ctrl {
            return Err(DdcError::ReadControlFailed(ctrl));
        }

        Ok(ControlValue {
            supported: reply[1] == 0,
            maximum: u16::from_be_bytes([reply[4], reply[5]]),
            value: u16::from_be_bytes([reply[6], reply[7]]),
        })
    }

    /// Fetch the capability chunk at `offset`.
    ///
    /// Returns the chunk content after the opcode and the offset echo. The
    /// reply must echo the requested offset, or the chunk sequence has
    /// slipped and the transaction is abandoned.
    pub fn read_caps_chunk(&mut self, offset: u16) -> DdcResult<Vec<u8>> {
        let [hi, lo] = offset.to_be_bytes();
        self.write_frame(&[COMMAND_CAPS, hi, lo])?;
        let reply = self.read_frame(CAPS_CHUNK)?;

        if reply.len() < 3
            || reply[0] != REPLY_CAPS
            || u16::from_be_bytes([reply[1], reply[2]]) != offset
        {
            return Err(DdcError::CapsChunkMismatch(offset));
        }

        Ok(reply[3..].to_vec())
    }

    /// Send a bare one-byte command.
    pub fn send_command(&mut self, opcode: u8) -> DdcResult<()> {
        self.write_frame(&[opcode])
    }

    /// Ask the monitor to persist its current settings.
    pub fn save_settings(&mut self) -> DdcResult<()> {
        self.send_command(COMMAND_SAVE)
    }

    /// Read and parse the 128-byte EDID base block at `edid_addr`.
    ///
    /// EDID is plain I2C against its own address: a 1-byte offset-0 write
    /// followed by a 128-byte read, bypassing DDC/CI framing and the
    /// quiescence timer entirely.
    pub fn read_edid(&mut self, edid_addr: u16) -> DdcResult<EdidIdentity> {
        self.bus
            .write(edid_addr, &[0x00])
            .map_err(|e| DdcError::EdidReadFailed {
                addr: edid_addr,
                reason: e.to_string(),
            })?;

        let mut raw = [0u8; EDID_LENGTH];
        let n = self
            .bus
            .read(edid_addr, &mut raw)
            .map_err(|e| DdcError::EdidReadFailed {
                addr: edid_addr,
                reason: e.to_string(),
            })?;
        if n < EDID_LENGTH {
            return Err(DdcError::EdidReadFailed {
                addr: edid_addr,
                reason: format!("short read: {n} bytes"),
            });
        }

        if self.config.verbosity >= Verbosity::Data {
            debug!("edid: {}", frame::hexdump(&raw));
        }

        edid::parse(&raw, edid_addr)
    }

    /// Release the underlying bus handle.
    pub fn close(mut self) -> DdcResult<()> {
        self.bus.close()
    }

    /// Give the bus handle back without closing it.
    pub fn into_bus(self) -> B {
        self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::reply_frame;
    use ddcci_core::DdcConfig;
    use ddcci_transport::{BusOp, MockBus};

    fn channel(script: Vec<BusOp>) -> (DdcChannel<MockBus>, MockBus) {
        let bus = MockBus::new(script);
        let probe = bus.clone();
        (
            DdcChannel::new(bus, DEFAULT_DDCCI_ADDR, DdcConfig::default()),
            probe,
        )
    }

    fn expect_write(payload: &[u8]) -> BusOp {
        BusOp::Write {
            addr: DEFAULT_DDCCI_ADDR,
            expect: frame::encode(DEFAULT_DDCCI_ADDR, payload).unwrap(),
        }
    }

    fn serve_reply(payload: &[u8]) -> BusOp {
        BusOp::Read {
            addr: DEFAULT_DDCCI_ADDR,
            reply: reply_frame(DEFAULT_DDCCI_ADDR, payload),
        }
    }

    #[test]
    fn write_control_puts_one_frame_on_the_bus() {
        let (mut chan, probe) = channel(vec![expect_write(&[0x03, 0x10, 0x00, 0x2d])]);
        chan.write_control(CTRL_BRIGHTNESS, 0x2d).unwrap();
        assert!(probe.is_exhausted());
    }

    #[test]
    fn read_control_parses_value_and_maximum() {
        let (mut chan, probe) = channel(vec![
            expect_write(&[0x01, 0x10]),
            serve_reply(&[0x02, 0x00, 0x10, 0x00, 0x00, 0x64, 0x00, 0x32]),
        ]);

        let ctrl = chan.read_control(CTRL_BRIGHTNESS).unwrap();
        assert_eq!(
            ctrl,
            ControlValue {
                supported: true,
                value: 0x32,
                maximum: 0x64,
            }
        );
        assert!(probe.is_exhausted());
    }

    #[test]
    fn read_control_reports_unsupported_register() {
        let (mut chan, _) = channel(vec![
            expect_write(&[0x01, 0xdd]),
            serve_reply(&[0x02, 0x01, 0xdd, 0x00, 0x00, 0x00, 0x00, 0x00]),
        ]);

        let ctrl = chan.read_control(0xdd).unwrap();
        assert!(!ctrl.supported);
    }

    #[test]
    fn read_control_rejects_register_echo_mismatch() {
        let (mut chan, _) = channel(vec![
            expect_write(&[0x01, 0x10]),
            serve_reply(&[0x02, 0x00, 0x12, 0x00, 0x00, 0x64, 0x00, 0x32]),
        ]);

        assert!(matches!(
            chan.read_control(CTRL_BRIGHTNESS),
            Err(DdcError::ReadControlFailed(0x10))
        ));
    }

    #[test]
    fn read_control_rejects_short_reply() {
        let (mut chan, _) = channel(vec![
            expect_write(&[0x01, 0x10]),
            serve_reply(&[0x02, 0x00, 0x10, 0x00]),
        ]);

        assert!(matches!(
            chan.read_control(CTRL_BRIGHTNESS),
            Err(DdcError::ReadControlFailed(0x10))
        ));
    }

    #[test]
    fn empty_read_is_a_bus_error() {
        let (mut chan, _) = channel(vec![
            expect_write(&[0x01, 0x10]),
            BusOp::Read {
                addr: DEFAULT_DDCCI_ADDR,
                reply: vec![],
            },
        ]);

        assert!(matches!(
            chan.read_control(CTRL_BRIGHTNESS),
            Err(DdcError::BusRead(_))
        ));
    }

    #[test]
    fn save_settings_is_a_single_byte_command() {
        let (mut chan, probe) = channel(vec![expect_write(&[0x0c])]);
        chan.save_settings().unwrap();
        assert!(probe.is_exhausted());
    }

    #[test]
    fn read_edid_parses_the_base_block() {
        let mut block = [0u8; EDID_LENGTH];
        block[..8].copy_from_slice(&crate::edid::EDID_HEADER);
        block[8] = 0x4c;
        block[9] = 0x2d;
        block[10] = 0x23;
        block[11] = 0x01;
        block[20] = 0x80;

        let (mut chan, probe) = channel(vec![
            BusOp::Write {
                addr: DEFAULT_EDID_ADDR,
                expect: vec![0x00],
            },
            BusOp::Read {
                addr: DEFAULT_EDID_ADDR,
                reply: block.to_vec(),
            },
        ]);

        let id = chan.read_edid(DEFAULT_EDID_ADDR).unwrap();
        assert_eq!(id.pnp_id, "SAM0123");
        assert!(id.digital);
        assert!(probe.is_exhausted());
    }

    #[test]
    fn failed_edid_exchange_is_reported_as_such() {
        let (mut chan, _) = channel(vec![BusOp::FailWrite {
            addr: DEFAULT_EDID_ADDR,
        }]);

        assert!(matches!(
            chan.read_edid(DEFAULT_EDID_ADDR),
            Err(DdcError::EdidReadFailed { addr: 0x50, .. })
        ));
    }
}
