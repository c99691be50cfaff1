//! mmdb-core: record models, storage backends and the record access layer.
//!
//! Every record kind (users, alerts, transactions) is persisted through the
//! [`KvStore`] trait. Concrete backends live in [`store`] and are selected per
//! record kind by [`MmdbConfig`]; the [`records`] module implements the CRUD
//! operations once against the trait.

pub mod config;
pub mod error;
pub mod models;
pub mod records;
pub mod store;

pub use config::{BackendKind, ConfigError, MmdbConfig};
pub use error::{RecordError, RecordResult, StoreError, StoreResult};
pub use models::{Alert, NewAlert, NewSkill, NewTransaction, NewUser, Skill, Transaction, User, UserPatch};
pub use records::{Records, RecordSet, TimedRecords, UserRecords};
pub use store::{KvStore, MemoryStore, Stores};
