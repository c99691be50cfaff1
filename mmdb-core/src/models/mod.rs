//! Record models and their creation/update payloads
//!
//! Payload types validate on demand and return `RecordError::Validation`,
//! never panic.

pub mod alert;
pub mod transaction;
pub mod user;
pub mod validation;

pub use alert::{Alert, NewAlert};
pub use transaction::{NewTransaction, Transaction};
pub use user::{NewSkill, NewUser, Skill, User, UserPatch};

/// Fresh server-side identifier
pub fn new_identifier() -> String {
    uuid::Uuid::new_v4().to_string()
}
