//! User operations, including skill management

use std::sync::Arc;

use tokio::sync::Mutex;

use super::RecordSet;
use crate::error::{RecordError, RecordResult};
use crate::models::validation::require;
use crate::models::{new_identifier, NewSkill, NewUser, User, UserPatch};
use crate::store::KvStore;

/// User records with name uniqueness.
///
/// Mutations run one at a time within the process so the name check and the
/// write it guards cannot interleave with another mutation.
#[derive(Clone)]
pub struct UserRecords {
    set: RecordSet<User>,
    writes: Arc<Mutex<()>>,
}

impl UserRecords {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            set: RecordSet::new(store),
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.set.backend_name()
    }

    pub async fn create(&self, payload: NewUser) -> RecordResult<User> {
        payload.validate()?;

        let _guard = self.writes.lock().await;
        self.ensure_name_free(&payload.name, None).await?;

        let user = payload.into_user(new_identifier());
        self.set.save(&user).await?;
        tracing::debug!(uuid = %user.uuid, "user created");
        Ok(user)
    }

    /// Fails with `NotFound("no users yet")` when there are none.
    pub async fn list(&self) -> RecordResult<Vec<User>> {
        self.set.list().await
    }

    pub async fn find(&self, id: &str) -> RecordResult<User> {
        require("uuid", id)?;
        self.set.get(id).await
    }

    /// Apply a partial update and return the merged record.
    pub async fn update(&self, id: &str, patch: UserPatch) -> RecordResult<User> {
        require("uuid", id)?;
        if patch.is_empty() {
            return Err(RecordError::validation("nothing to update"));
        }

        let _guard = self.writes.lock().await;
        let mut user = self.set.get(id).await?;
        if let Some(name) = &patch.name {
            if *name != user.name {
                self.ensure_name_free(name, Some(id)).await?;
            }
        }

        patch.apply(&mut user);
        self.set.save(&user).await?;
        tracing::debug!(uuid = %user.uuid, "user updated");
        Ok(user)
    }

    /// Delete and return the removed user.
    pub async fn delete(&self, id: &str) -> RecordResult<User> {
        require("uuid", id)?;

        let _guard = self.writes.lock().await;
        let user = self.set.get(id).await?;
        self.set.remove(id).await?;
        tracing::debug!(uuid = %user.uuid, "user deleted");
        Ok(user)
    }

    /// Append a skill with a fresh identifier.
    pub async fn add_skill(&self, user_id: &str, skill: NewSkill) -> RecordResult<User> {
        require("uuid", user_id)?;
        skill.validate()?;

        let _guard = self.writes.lock().await;
        let mut user = self.set.get(user_id).await?;
        user.skills.push(skill.into_skill(new_identifier()));
        self.set.save(&user).await?;
        tracing::debug!(uuid = %user.uuid, skills = user.skills.len(), "skill added");
        Ok(user)
    }

    /// Drop every skill with `skill_id`. An unknown skill id leaves the user
    /// unchanged.
    pub async fn remove_skill(&self, user_id: &str, skill_id: &str) -> RecordResult<User> {
        require("user_uuid", user_id)?;
        require("skill_uuid", skill_id)?;

        let _guard = self.writes.lock().await;
        let mut user = self.set.get(user_id).await?;
        user.skills.retain(|skill| skill.uuid != skill_id);
        self.set.save(&user).await?;
        tracing::debug!(uuid = %user.uuid, skills = user.skills.len(), "skill removed");
        Ok(user)
    }

    /// Callers must hold `writes`.
    async fn ensure_name_free(&self, name: &str, except: Option<&str>) -> RecordResult<()> {
        let taken = self
            .set
            .all()
            .await?
            .iter()
            .any(|user| user.name == name && Some(user.uuid.as_str()) != except);
        if taken {
            return Err(RecordError::conflict("name already in use"));
        }
        Ok(())
    }
}
