//! MongoDB-backed lock store.

use crate::config::Config;
use crate::error::{LockError, Result};
use crate::record::LockRecord;
use crate::store::LockStore;
use mongodb::bson::doc;
use mongodb::sync::{Client, Collection};
use tracing::debug;

/// Lock store bound to one fixed database and collection for its lifetime.
///
/// The binding is established at construction and never changes; an
/// unreachable backend is reported as [`LockError::Connection`] before the
/// store is handed out.
pub struct MongoLockStore {
    collection: Collection<LockRecord>,
}

impl MongoLockStore {
    /// Open a store for the database and collection named in the config.
    ///
    /// The server is pinged so that an unreachable backend fails construction
    /// instead of the first query.
    ///
    /// # Arguments
    ///
    /// * `config` - Connection string plus database and collection names
    ///
    /// # Returns
    ///
    /// * `Ok(MongoLockStore)` - Successfully connected store
    /// * `Err(LockError::Connection)` - Backend unreachable
    pub fn connect(config: &Config) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri).map_err(|e| {
            LockError::Connection(format!(
                "failed to open MongoDB client for '{}': {}",
                config.uri, e
            ))
        })?;

        let database = client.database(&config.database);
        database.run_command(doc! { "ping": 1 }, None).map_err(|e| {
            LockError::Connection(format!("MongoDB at '{}' is unreachable: {}", config.uri, e))
        })?;

        debug!(
            database = %config.database,
            collection = %config.collection,
            "connected lock store"
        );

        Ok(Self {
            collection: database.collection(&config.collection),
        })
    }

    /// Name of the bound database.
    pub fn database_name(&self) -> String {
        self.collection.namespace().db
    }

    /// Name of the bound collection.
    pub fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

impl LockStore for MongoLockStore {
    fn insert(&self, record: &LockRecord) -> Result<()> {
        self.collection.insert_one(record, None).map_err(|e| {
            LockError::Storage(format!(
                "failed to insert lock record for '{}': {}",
                record.component, e
            ))
        })?;

        debug!(component = %record.component, "inserted lock record");
        Ok(())
    }

    fn query_locks(&self) -> Result<Vec<LockRecord>> {
        // All-matching filter: every stored record is a live advisory lock.
        let cursor = self
            .collection
            .find(doc! {}, None)
            .map_err(|e| LockError::Storage(format!("failed to query lock records: {}", e)))?;

        let mut records = Vec::new();
        for result in cursor {
            let record = result
                .map_err(|e| LockError::Storage(format!("failed to read lock record: {}", e)))?;
            records.push(record);
        }

        debug!(count = records.len(), "queried lock records");
        Ok(records)
    }

    fn remove_component(&self, component: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "component": component }, None)
            .map_err(|e| {
                LockError::Storage(format!(
                    "failed to remove lock records for '{}': {}",
                    component, e
                ))
            })?;

        debug!(component = %component, count = result.deleted_count, "removed lock records");
        Ok(result.deleted_count)
    }

    fn remove_older_than(&self, cutoff: i64) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "time": { "$lt": cutoff } }, None)
            .map_err(|e| {
                LockError::Storage(format!("failed to remove stale lock records: {}", e))
            })?;

        debug!(cutoff, count = result.deleted_count, "removed stale lock records");
        Ok(result.deleted_count)
    }
}
