//! Linux i2c-dev transport

use std::fmt;
use std::path::{Path, PathBuf};

use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CBus, LinuxI2CMessage};

use ddcci_core::{DdcError, DdcResult};

use crate::bus::I2cBus;

/// Transport over a `/dev/i2c-N` device node.
///
/// Each operation issues a single-message `I2C_RDWR` transfer with the
/// target address carried in the message itself; no slave address is bound
/// to the file descriptor.
pub struct I2cDevBus {
    path: PathBuf,
    bus: Option<LinuxI2CBus>,
}

impl fmt::Debug for I2cDevBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I2cDevBus")
            .field("path", &self.path)
            .field("open", &self.bus.is_some())
            .finish()
    }
}

impl I2cDevBus {
    /// Open the bus device node at `path`.
    ///
    /// Requires the `i2c-dev` kernel module and read/write access to the
    /// node.
    pub fn open<P: AsRef<Path>>(path: P) -> DdcResult<Self> {
        let path = path.as_ref().to_path_buf();
        let bus = LinuxI2CBus::new(&path).map_err(|e| DdcError::OpenFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            path,
            bus: Some(bus),
        })
    }

    /// Path of the underlying device node.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl I2cBus for I2cDevBus {
    fn write(&mut self, addr: u16, buf: &[u8]) -> DdcResult<usize> {
        let bus = self.bus.as_mut().ok_or_else(|| {
            DdcError::BusWrite(format!("{} is closed", self.path.display()))
        })?;
        let mut msgs = [LinuxI2CMessage::write(buf).with_address(addr)];
        bus.transfer(&mut msgs)
            .map_err(|e| DdcError::BusWrite(format!("{}: {}", self.path.display(), e)))?;
        Ok(buf.len())
    }

    fn read(&mut self, addr: u16, buf: &mut [u8]) -> DdcResult<usize> {
        let bus = self.bus.as_mut().ok_or_else(|| {
            DdcError::BusRead(format!("{} is closed", self.path.display()))
        })?;
        let len = buf.len();
        let mut msgs = [LinuxI2CMessage::read(buf).with_address(addr)];
        bus.transfer(&mut msgs)
            .map_err(|e| DdcError::BusRead(format!("{}: {}", self.path.display(), e)))?;
        Ok(len)
    }

    fn close(&mut self) -> DdcResult<()> {
        // Dropping the handle closes the descriptor.
        self.bus = None;
        Ok(())
    }
}
