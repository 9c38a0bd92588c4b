//! Advisory module locks over a shared MongoDB collection.
//!
//! A component records "I am busy" by inserting a lock record into a shared
//! collection and asks "may I proceed?" by checking whether any records exist.
//!
//! # Lock Records
//!
//! Each record identifies its holder:
//! - `component`: the module/component holding the lock
//! - `pid`: the process ID of the holder
//! - `host`: the hostname of the holder
//! - `time`: lock creation time as epoch seconds
//! - `date`: human-readable rendering of the same instant
//!
//! Both timestamp fields derive from one instant and never drift apart.
//!
//! # Decision Procedure
//!
//! [`LockController::go`] returns `true` when the collection holds no records
//! and `false` otherwise. The `locking` kill switch in [`Config`] forces
//! `true` unconditionally when disabled.
//!
//! # Advisory Only
//!
//! Locks are cooperative signals: nothing prevents a caller from proceeding
//! without checking, and there is no atomicity between the `go()` read and a
//! subsequent `lock()` write. Two callers may both observe "no locks" and
//! both proceed. Callers needing a real mutual-exclusion guarantee must look
//! elsewhere.
//!
//! # Storage
//!
//! The controller depends on the [`LockStore`] capability trait;
//! [`MongoLockStore`] binds it to one fixed database and collection for the
//! store's lifetime.

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod mongo;
pub mod record;
pub mod store;

// Re-export public API
pub use config::{Config, Locking};
pub use context::HostContext;
pub use controller::LockController;
pub use error::{LockError, Result};
pub use mongo::MongoLockStore;
pub use record::{DATE_FORMAT, LockRecord};
pub use store::LockStore;
