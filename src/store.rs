//! Storage capability for lock records.

use crate::error::Result;
use crate::record::LockRecord;

/// Capability interface over the lock collection.
///
/// The controller only depends on this trait, so its decision logic can be
/// exercised against an in-memory double without a live backend.
/// [`MongoLockStore`](crate::MongoLockStore) is the production implementation.
pub trait LockStore: Send {
    /// Persist a lock record.
    fn insert(&self, record: &LockRecord) -> Result<()>;

    /// Return all stored lock records, in storage order.
    ///
    /// The sequence may be empty; order is not otherwise guaranteed.
    fn query_locks(&self) -> Result<Vec<LockRecord>>;

    /// Remove all records held by the given component.
    ///
    /// Returns the number of removed records.
    fn remove_component(&self, component: &str) -> Result<u64>;

    /// Remove all records created before `cutoff` (epoch seconds).
    ///
    /// Returns the number of removed records.
    fn remove_older_than(&self, cutoff: i64) -> Result<u64>;
}
