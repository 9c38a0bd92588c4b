//! Lock record document model.

use crate::context::HostContext;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Format for the human-readable `date` field (asctime layout,
/// e.g. `Fri Jan  1 00:00:00 2021`).
pub const DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// The document persisted per active lock.
///
/// `time` and `date` are two renderings of the same instant: both are derived
/// from the single `now` value passed to [`LockRecord::build`], so they never
/// drift apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Name of the component holding the lock.
    pub component: String,

    /// Process ID of the holder.
    pub pid: u32,

    /// Hostname of the holder.
    pub host: String,

    /// Lock creation time as epoch seconds.
    pub time: i64,

    /// Human-readable rendering of the same instant.
    pub date: String,
}

impl LockRecord {
    /// Build a lock record for the given component and holder identity.
    ///
    /// Pure transformation: no storage I/O. Both timestamp fields derive from
    /// the single `now` value.
    pub fn build(component: &str, ctx: &HostContext, now: DateTime<Utc>) -> Self {
        Self {
            component: component.to_string(),
            pid: ctx.pid,
            host: ctx.host.clone(),
            time: now.timestamp(),
            date: now.format(DATE_FORMAT).to_string(),
        }
    }

    /// Calculate the age of the lock relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds(now.timestamp() - self.time)
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self, now: DateTime<Utc>) -> String {
        let age = self.age(now);
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// Check if the lock is stale based on the given threshold in minutes.
    pub fn is_stale(&self, now: DateTime<Utc>, stale_minutes: u32) -> bool {
        self.age(now).num_minutes() > stale_minutes as i64
    }
}

impl std::fmt::Display for LockRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (pid {} on {}, since {})",
            self.component, self.pid, self.host, self.date
        )
    }
}
