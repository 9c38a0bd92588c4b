//! Lock controller: the advisory "may I proceed?" decision surface.

use crate::config::{Config, Locking};
use crate::context::HostContext;
use crate::error::Result;
use crate::record::LockRecord;
use crate::store::LockStore;
use chrono::{DateTime, Utc};
use tracing::warn;

/// Records and checks advisory locks for one component.
///
/// The controller holds its store for its whole lifetime and keeps no state
/// of its own between calls; all lock state lives in storage. The check
/// performed by [`go`](LockController::go) is advisory only: there is no
/// atomicity between the read and a subsequent [`lock`](LockController::lock)
/// write, so two callers may both observe "no locks" and both proceed.
pub struct LockController<S: LockStore> {
    store: S,
    component: String,
    ctx: HostContext,
    locking: Locking,
    stale_minutes: u32,
}

impl<S: LockStore> LockController<S> {
    /// Create a controller for the given component.
    ///
    /// # Arguments
    ///
    /// * `store` - Storage backend, held for the controller's lifetime
    /// * `component` - Name of the component this controller locks for
    /// * `ctx` - Identity of the holding process
    /// * `config` - Locking mode and stale threshold
    pub fn new(
        store: S,
        component: impl Into<String>,
        ctx: HostContext,
        config: &Config,
    ) -> Self {
        Self {
            store,
            component: component.into(),
            ctx,
            locking: config.locking,
            stale_minutes: config.stale_minutes,
        }
    }

    /// Name of the component this controller locks for.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Current locking mode.
    pub fn locking(&self) -> Locking {
        self.locking
    }

    /// Change the locking mode at runtime.
    pub fn set_locking(&mut self, locking: Locking) {
        self.locking = locking;
    }

    /// Build the lock record this controller would persist at `now`.
    ///
    /// Pure transformation: no storage I/O. `component`, `pid`, and `host`
    /// come from the controller's identity; `time` and `date` are both
    /// renderings of `now`.
    pub fn build_record(&self, now: DateTime<Utc>) -> LockRecord {
        LockRecord::build(&self.component, &self.ctx, now)
    }

    /// Record that this component is busy as of `now`.
    ///
    /// Inserts the record [`build_record`](LockController::build_record)
    /// produces and returns it.
    ///
    /// # Returns
    ///
    /// * `Ok(LockRecord)` - The persisted record
    /// * `Err(LockError::Storage)` - Write failed
    pub fn lock(&self, now: DateTime<Utc>) -> Result<LockRecord> {
        let record = self.build_record(now);
        self.store.insert(&record)?;
        Ok(record)
    }

    /// Return all currently stored lock records.
    ///
    /// Read-only; the sequence may be empty and is in storage order.
    pub fn get(&self) -> Result<Vec<LockRecord>> {
        self.store.query_locks()
    }

    /// Check whether it is safe to proceed.
    ///
    /// When locking is disabled this returns `true` without touching storage.
    /// Otherwise it returns `true` only when no lock records exist; any
    /// non-empty result, regardless of content, means "must not proceed".
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Clear to proceed
    /// * `Ok(false)` - At least one active lock
    /// * `Err(LockError::Storage)` - The underlying query failed
    pub fn go(&self) -> Result<bool> {
        if self.locking == Locking::Disabled {
            return Ok(true);
        }

        Ok(self.get()?.is_empty())
    }

    /// Remove this component's lock records.
    ///
    /// Returns the number of removed records. Also invoked best-effort when
    /// the controller is dropped.
    pub fn clean(&self) -> Result<u64> {
        self.store.remove_component(&self.component)
    }

    /// Remove lock records older than the configured stale threshold.
    ///
    /// "Stale" means created more than `stale_minutes` before `now`,
    /// regardless of component. Returns the number of removed records.
    pub fn purge_stale(&self, now: DateTime<Utc>) -> Result<u64> {
        let cutoff = now.timestamp() - i64::from(self.stale_minutes) * 60;
        self.store.remove_older_than(cutoff)
    }
}

impl<S: LockStore> Drop for LockController<S> {
    fn drop(&mut self) {
        if let Err(e) = self.clean() {
            warn!(
                component = %self.component,
                "failed to clean lock records on teardown: {}", e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LockError;
    use chrono::{Duration, TimeZone};
    use std::sync::{Arc, Mutex};

    /// In-memory stand-in for the lock collection.
    ///
    /// The record vector is shared so tests can seed and inspect it while the
    /// controller owns the store.
    #[derive(Default)]
    struct MockStore {
        records: Arc<Mutex<Vec<LockRecord>>>,
        fail_queries: bool,
    }

    impl MockStore {
        fn with_records(records: Arc<Mutex<Vec<LockRecord>>>) -> Self {
            Self {
                records,
                fail_queries: false,
            }
        }

        fn failing() -> Self {
            Self {
                records: Arc::default(),
                fail_queries: true,
            }
        }
    }

    impl LockStore for MockStore {
        fn insert(&self, record: &LockRecord) -> crate::error::Result<()> {
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }

        fn query_locks(&self) -> crate::error::Result<Vec<LockRecord>> {
            if self.fail_queries {
                return Err(LockError::Storage("query refused".to_string()));
            }
            Ok(self.records.lock().unwrap().clone())
        }

        fn remove_component(&self, component: &str) -> crate::error::Result<u64> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.component != component);
            Ok((before - records.len()) as u64)
        }

        fn remove_older_than(&self, cutoff: i64) -> crate::error::Result<u64> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.time >= cutoff);
            Ok((before - records.len()) as u64)
        }
    }

    fn test_context() -> HostContext {
        HostContext {
            pid: 4242,
            host: "node1.example".to_string(),
        }
    }

    fn test_record(component: &str, now: DateTime<Utc>) -> LockRecord {
        LockRecord::build(component, &test_context(), now)
    }

    fn controller(store: MockStore) -> LockController<MockStore> {
        LockController::new(store, "workflow", test_context(), &Config::default())
    }

    #[test]
    fn test_build_record_uses_controller_identity() {
        let ctrl = controller(MockStore::default());
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

        let record = ctrl.build_record(now);

        assert_eq!(record.component, "workflow");
        assert_eq!(record.pid, 4242);
        assert_eq!(record.host, "node1.example");
        assert_eq!(record.time, 1609459200);
        assert_eq!(record.date, "Fri Jan  1 00:00:00 2021");
    }

    #[test]
    fn test_go_true_when_no_locks() {
        let ctrl = controller(MockStore::default());

        assert!(ctrl.go().unwrap());
    }

    #[test]
    fn test_go_false_when_locks_present() {
        let records = Arc::new(Mutex::new(vec![
            test_record("reporter", Utc::now()),
            test_record("injector", Utc::now()),
        ]));
        let ctrl = controller(MockStore::with_records(records));

        assert!(!ctrl.go().unwrap());
    }

    #[test]
    fn test_go_true_when_locking_disabled() {
        let records = Arc::new(Mutex::new(vec![test_record("reporter", Utc::now())]));
        let config = Config {
            locking: Locking::Disabled,
            ..Config::default()
        };
        let ctrl = LockController::new(
            MockStore::with_records(records),
            "workflow",
            test_context(),
            &config,
        );

        // Kill switch overrides stored state entirely.
        assert!(ctrl.go().unwrap());
    }

    #[test]
    fn test_go_disabled_skips_storage() {
        let config = Config {
            locking: Locking::Disabled,
            ..Config::default()
        };
        let ctrl =
            LockController::new(MockStore::failing(), "workflow", test_context(), &config);

        // The failing store would error if go() queried it.
        assert!(ctrl.go().unwrap());
    }

    #[test]
    fn test_go_propagates_storage_error() {
        let ctrl = controller(MockStore::failing());

        let result = ctrl.go();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), LockError::Storage(_)));
    }

    #[test]
    fn test_set_locking_toggles_decision() {
        let records = Arc::new(Mutex::new(vec![test_record("reporter", Utc::now())]));
        let mut ctrl = controller(MockStore::with_records(records));

        assert!(!ctrl.go().unwrap());

        ctrl.set_locking(Locking::Disabled);
        assert_eq!(ctrl.locking(), Locking::Disabled);
        assert!(ctrl.go().unwrap());
    }

    #[test]
    fn test_lock_inserts_built_record() {
        let records: Arc<Mutex<Vec<LockRecord>>> = Arc::default();
        let ctrl = controller(MockStore::with_records(records.clone()));
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();

        let inserted = ctrl.lock(now).unwrap();

        assert_eq!(inserted, ctrl.build_record(now));
        assert_eq!(records.lock().unwrap().as_slice(), &[inserted]);
    }

    #[test]
    fn test_get_returns_stored_records() {
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let seeded = vec![test_record("workflow", now), test_record("reporter", now)];
        let records = Arc::new(Mutex::new(seeded.clone()));
        let ctrl = controller(MockStore::with_records(records));

        assert_eq!(ctrl.get().unwrap(), seeded);
    }

    #[test]
    fn test_clean_removes_only_own_component() {
        let now = Utc::now();
        let records = Arc::new(Mutex::new(vec![
            test_record("workflow", now),
            test_record("workflow", now),
            test_record("reporter", now),
        ]));
        let ctrl = controller(MockStore::with_records(records.clone()));

        let removed = ctrl.clean().unwrap();

        assert_eq!(removed, 2);
        let remaining = records.lock().unwrap().clone();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].component, "reporter");
    }

    #[test]
    fn test_purge_stale_uses_configured_threshold() {
        let now = Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap();
        let fresh = test_record("reporter", now - Duration::minutes(30));
        let stale = test_record("injector", now - Duration::minutes(150));
        let records = Arc::new(Mutex::new(vec![fresh.clone(), stale]));
        let ctrl = controller(MockStore::with_records(records.clone()));

        // Default threshold is 120 minutes.
        let removed = ctrl.purge_stale(now).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(records.lock().unwrap().as_slice(), &[fresh]);
    }

    #[test]
    fn test_drop_cleans_own_records() {
        let now = Utc::now();
        let records = Arc::new(Mutex::new(vec![
            test_record("workflow", now),
            test_record("reporter", now),
        ]));

        {
            let _ctrl = controller(MockStore::with_records(records.clone()));
        }

        let remaining = records.lock().unwrap().clone();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].component, "reporter");
    }
}
