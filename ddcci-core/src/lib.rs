//! Core types and utilities for DDC/CI monitor control
//!
//! This crate provides the error taxonomy and engine configuration shared
//! by every layer of the DDC/CI implementation.

pub mod config;
pub mod error;

pub use config::{DdcConfig, Verbosity};
pub use error::{DdcError, DdcResult};
