//! Host and process identity for lock records.
//!
//! Rather than reading ambient global state inside the record builder, the
//! identity of the lock holder is captured once into a [`HostContext`] and
//! passed explicitly, keeping record construction deterministic and testable.

use serde::{Deserialize, Serialize};

/// Identity of the process that holds (or would hold) a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostContext {
    /// Process ID of the holder.
    pub pid: u32,

    /// Hostname of the holder.
    pub host: String,
}

impl HostContext {
    /// Capture the identity of the current process.
    ///
    /// Falls back to "unknown" when the hostname cannot be determined.
    pub fn capture() -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            pid: std::process::id(),
            host,
        }
    }
}
