//! Scripted bus double for deterministic engine tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ddcci_core::{DdcError, DdcResult};

use crate::bus::I2cBus;

/// One scripted bus transaction.
#[derive(Debug, Clone)]
pub enum BusOp {
    /// Expect a write of exactly these bytes to this address.
    Write { addr: u16, expect: Vec<u8> },
    /// Serve these bytes to the next read from this address.
    Read { addr: u16, reply: Vec<u8> },
    /// Fail the next write to this address.
    FailWrite { addr: u16 },
    /// Fail the next read from this address.
    FailRead { addr: u16 },
}

#[derive(Debug, Default)]
struct MockState {
    script: VecDeque<BusOp>,
    closed: bool,
}

/// Bus double that replays a fixed transaction script.
///
/// Panics on any deviation from the script, so a test failure points at the
/// first wrong byte on the bus. Clones share the same script state, letting
/// a test keep one handle for inspection after the engine has consumed the
/// other.
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    state: Rc<RefCell<MockState>>,
}

impl MockBus {
    pub fn new(script: Vec<BusOp>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState {
                script: script.into(),
                closed: false,
            })),
        }
    }

    /// True once every scripted transaction has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.state.borrow().script.is_empty()
    }

    /// True after `close()` was called on any clone.
    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }
}

impl I2cBus for MockBus {
    fn write(&mut self, addr: u16, buf: &[u8]) -> DdcResult<usize> {
        let mut state = self.state.borrow_mut();
        match state.script.pop_front() {
            Some(BusOp::Write { addr: want, expect }) => {
                assert_eq!(addr, want, "write sent to wrong address");
                assert_eq!(buf, &expect[..], "unexpected bytes on the bus");
                Ok(buf.len())
            }
            Some(BusOp::FailWrite { addr: want }) => {
                assert_eq!(addr, want, "write sent to wrong address");
                Err(DdcError::BusWrite("scripted write failure".into()))
            }
            other => panic!(
                "unexpected write of {:02x?} to 0x{:02x}, script had {:?}",
                buf, addr, other
            ),
        }
    }

    fn read(&mut self, addr: u16, buf: &mut [u8]) -> DdcResult<usize> {
        let mut state = self.state.borrow_mut();
        match state.script.pop_front() {
            Some(BusOp::Read { addr: want, reply }) => {
                assert_eq!(addr, want, "read sent to wrong address");
                let n = reply.len().min(buf.len());
                buf[..n].copy_from_slice(&reply[..n]);
                Ok(n)
            }
            Some(BusOp::FailRead { addr: want }) => {
                assert_eq!(addr, want, "read sent to wrong address");
                Err(DdcError::BusRead("scripted read failure".into()))
            }
            other => panic!(
                "unexpected read of {} bytes from 0x{:02x}, script had {:?}",
                buf.len(),
                addr,
                other
            ),
        }
    }

    fn close(&mut self) -> DdcResult<()> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}
