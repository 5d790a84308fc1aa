//! Bus device enumeration

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use ddcci_core::{DdcConfig, DdcResult};

use crate::monitor::Monitor;
use crate::profile::ProfileDatabase;

/// Directory scanned for bus device nodes.
const DEV_DIR: &str = "/dev";
/// Device-node prefix of i2c buses.
const NODE_PREFIX: &str = "i2c-";

/// One discovered monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryEntry {
    /// Bus device node the monitor answered on.
    pub path: PathBuf,
    /// Display name from the profile database, or a label synthesized
    /// from the EDID identity.
    pub name: String,
    /// The input is digital.
    pub digital: bool,
    /// The DDC/CI handshake was answered (false: EDID-only).
    pub ddcci: bool,
}

/// Scan `/dev` for i2c bus nodes with a monitor behind them.
///
/// Every node whose EDID is readable yields one entry, whether or not it
/// also answered the DDC/CI handshake; the probe connection is closed
/// again right away. Entries come in directory iteration order.
pub fn probe(db: &dyn ProfileDatabase, config: &DdcConfig) -> DdcResult<Vec<DiscoveryEntry>> {
    probe_dir(Path::new(DEV_DIR), db, config)
}

/// Scan an arbitrary directory for `i2c-` device nodes.
///
/// One node's failure never aborts the scan of the remaining nodes; only
/// an unreadable directory is an error.
pub fn probe_dir(
    dir: &Path,
    db: &dyn ProfileDatabase,
    config: &DdcConfig,
) -> DdcResult<Vec<DiscoveryEntry>> {
    let mut found = Vec::new();

    for entry in fs::read_dir(dir)? {
        let Ok(entry) = entry else { continue };
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.starts_with(NODE_PREFIX) {
            continue;
        }

        let path = entry.path();
        debug!("found i2c device node {}", path.display());

        match Monitor::open(&path, db, config.clone()) {
            Ok(monitor) => {
                found.push(DiscoveryEntry {
                    path: path.clone(),
                    name: monitor.display_name(),
                    digital: monitor.is_digital(),
                    ddcci: monitor.is_ddcci_active(),
                });
                if let Err(e) = monitor.close() {
                    warn!("{}: close after probe failed: {e}", path.display());
                }
            }
            Err(e) => {
                debug!("{}: no monitor: {e}", path.display());
            }
        }
    }

    info!("probe found {} monitor(s)", found.len());
    Ok(found)
}
