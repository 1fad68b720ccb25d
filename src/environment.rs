use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::dotenv::Entry;

/// The complete environment handed to a child process.
pub type EnvMap = BTreeMap<OsString, OsString>;

/// Snapshot of this process's environment.
pub fn inherited() -> EnvMap {
    std::env::vars_os().collect()
}

/// Layers `overrides` on top of `base`, in order. Later entries win over
/// earlier ones and over anything inherited.
pub fn merge(mut base: EnvMap, overrides: &[Entry]) -> EnvMap {
    for Entry { key, value } in overrides {
        if let Some(previous) = base.insert(key.into(), value.into()) {
            log::trace!("{key} overrides inherited value ({} bytes)", previous.len());
        }
    }
    base
}
