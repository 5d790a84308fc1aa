//! Transport layer for DDC/CI monitor control
//!
//! This crate provides the raw bus primitive the protocol engine consumes:
//! the [`I2cBus`] trait for single addressed transactions, the Linux
//! `/dev/i2c-N` implementation, and a scripted mock for deterministic
//! tests.

pub mod bus;
pub mod i2c;
pub mod mock;

pub use bus::I2cBus;
pub use i2c::I2cDevBus;
pub use mock::{BusOp, MockBus};
