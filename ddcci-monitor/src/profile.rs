//! Vendor/model profile database interface
//!
//! The database itself is an external collaborator; this module only
//! defines the seam the lifecycle consults through.

use std::sync::Arc;

use crate::handshake::HandshakeKind;

/// One record of the external monitor database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Human-readable display name, e.g. `"Samsung SyncMaster 173P"`.
    pub name: String,
    /// Initialization handshake this monitor requires.
    pub init: HandshakeKind,
}

/// Lookup interface of the external vendor/model database.
///
/// Profiles come back as shared references owned by the database;
/// releasing one is dropping the `Arc`.
pub trait ProfileDatabase {
    /// Find the profile for a PNP identity, if the database knows it.
    fn lookup(&self, pnp_id: &str) -> Option<Arc<Profile>>;
}

/// Database with no entries, for callers that have none.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDatabase;

impl ProfileDatabase for EmptyDatabase {
    fn lookup(&self, _pnp_id: &str) -> Option<Arc<Profile>> {
        None
    }
}
