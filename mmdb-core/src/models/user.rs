//! User and Skill records

use serde::{Deserialize, Serialize};

use super::validation::{provided, require};
use crate::error::{RecordError, RecordResult};
use crate::records::Record;

/// A user with a unique display name and an ordered list of skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uuid: String,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

/// A skill owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub uuid: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub level: i64,
}

impl Record for User {
    const NAMESPACE: &'static str = "user";
    const KIND: &'static str = "user";
    const PLURAL: &'static str = "users";

    fn id(&self) -> &str {
        &self.uuid
    }
}

/// Payload for creating a user
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub location: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn validate(&self) -> RecordResult<()> {
        require("name", &self.name)?;
        require("location", &self.location)
    }

    /// Build the stored record. New users start with no skills.
    pub fn into_user(self, uuid: String) -> User {
        User {
            uuid,
            name: self.name,
            location: self.location,
            skills: Vec::new(),
        }
    }
}

/// Partial update for a user.
///
/// Empty strings count as "not provided", so a patch can change a field to
/// another non-empty value but never clear it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub location: Option<String>,
}

impl UserPatch {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: provided(name),
            location: provided(location),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.location.is_none()
    }

    /// Overwrite the fields this patch carries.
    pub fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(location) = self.location {
            user.location = location;
        }
    }
}

/// Payload for appending a skill
#[derive(Debug, Clone)]
pub struct NewSkill {
    pub kind: String,
    pub level: i64,
}

impl NewSkill {
    pub fn new(kind: impl Into<String>, level: i64) -> Self {
        Self {
            kind: kind.into(),
            level,
        }
    }

    pub fn validate(&self) -> RecordResult<()> {
        require("type", &self.kind)?;
        if self.level < 1 {
            return Err(RecordError::invalid("level"));
        }
        Ok(())
    }

    pub fn into_skill(self, uuid: String) -> Skill {
        Skill {
            uuid,
            kind: self.kind,
            level: self.level,
        }
    }
}
