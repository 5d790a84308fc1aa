//! Bus accessor trait for the raw I2C primitive

use ddcci_core::DdcResult;

/// Byte-level access to one I2C bus device node.
///
/// Every call is a single atomic addressed transaction that blocks until
/// the underlying transfer completes or errors. The target address travels
/// with each call, so one handle can address both the DDC/CI logic and the
/// EDID EEPROM of the same connector.
///
/// Protocol-level concerns (framing, checksums, command timing) are handled
/// by the engine that consumes this trait.
pub trait I2cBus {
    /// Write `buf` to the device at `addr` in one transaction.
    ///
    /// # Returns
    ///
    /// Number of bytes written.
    fn write(&mut self, addr: u16, buf: &[u8]) -> DdcResult<usize>;

    /// Read up to `buf.len()` bytes from the device at `addr` in one
    /// transaction.
    ///
    /// # Returns
    ///
    /// Number of bytes read; zero means the device gave no answer.
    fn read(&mut self, addr: u16, buf: &mut [u8]) -> DdcResult<usize>;

    /// Release the bus handle.
    ///
    /// After `close()`, subsequent `write()` and `read()` calls fail.
    fn close(&mut self) -> DdcResult<()>;
}
