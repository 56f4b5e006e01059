//! In-process store
//!
//! Keeps teams and users in memory with the same semantics as the REST
//! backend (shallow PATCH, 404 on unknown ids). Writes can be scripted with
//! [`WritePlan`]s to fail or to settle late, which is how the optimistic
//! engine's rollback paths are exercised without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kb_models::{new_id, NewTeam, Team, TeamPatch, UserRecord};
use parking_lot::Mutex;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::RemoteStore;

/// How the next write call behaves
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WritePlan {
    /// Time the write takes before it settles
    pub delay: Duration,
    /// Settle with this failure instead of applying the write
    pub failure: Option<String>,
}

impl WritePlan {
    pub fn succeed() -> Self {
        Self::default()
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            failure: Some(message.into()),
        }
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    pub fn fail_after(delay: Duration, message: impl Into<String>) -> Self {
        Self {
            delay,
            failure: Some(message.into()),
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    teams: RwLock<Vec<Team>>,
    users: RwLock<HashMap<String, UserRecord>>,
    plans: Mutex<VecDeque<WritePlan>>,
    patches: Mutex<Vec<(String, TeamPatch)>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with teams
    pub fn with_teams(teams: Vec<Team>) -> Self {
        Self {
            teams: RwLock::new(teams),
            ..Self::default()
        }
    }

    /// Queue plans for upcoming writes, consumed in call order.
    /// Writes without a queued plan succeed immediately.
    pub fn script_writes(&self, plans: impl IntoIterator<Item = WritePlan>) {
        self.plans.lock().extend(plans);
    }

    /// Make the next write fail
    pub fn fail_next_write(&self, message: impl Into<String>) {
        self.script_writes([WritePlan::fail(message)]);
    }

    /// Every `PATCH teams/{id}` applied so far
    pub fn patches(&self) -> Vec<(String, TeamPatch)> {
        self.patches.lock().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Write calls attempted, including failed ones
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current stored copy of a team
    pub async fn team(&self, id: &str) -> Option<Team> {
        self.teams.read().await.iter().find(|t| t.id == id).cloned()
    }

    async fn begin_write(&self) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let plan = self.plans.lock().pop_front().unwrap_or_default();
        if !plan.delay.is_zero() {
            tokio::time::sleep(plan.delay).await;
        }
        match plan.failure {
            Some(message) => Err(StoreError::Injected(message)),
            None => Ok(()),
        }
    }

    fn begin_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        self.begin_read();
        Ok(self.teams.read().await.clone())
    }

    async fn get_team(&self, id: &str) -> StoreResult<Team> {
        self.begin_read();
        self.team(id)
            .await
            .ok_or_else(|| StoreError::not_found("teams", id))
    }

    async fn create_team(&self, team: &NewTeam) -> StoreResult<Team> {
        self.begin_write().await?;
        let id = team.id.clone().unwrap_or_else(new_id);
        let created = team.clone().into_team(id);

        let mut teams = self.teams.write().await;
        if teams.iter().any(|t| t.id == created.id) {
            return Err(StoreError::Http {
                status: 409,
                message: format!("team {} already exists", created.id),
            });
        }
        teams.push(created.clone());
        Ok(created)
    }

    async fn patch_team(&self, id: &str, patch: &TeamPatch) -> StoreResult<Team> {
        self.begin_write().await?;
        let mut teams = self.teams.write().await;
        let team = teams
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::not_found("teams", id))?;
        patch.clone().apply_to(team);
        self.patches.lock().push((id.to_string(), patch.clone()));
        Ok(team.clone())
    }

    async fn delete_team(&self, id: &str) -> StoreResult<()> {
        self.begin_write().await?;
        let mut teams = self.teams.write().await;
        let before = teams.len();
        teams.retain(|t| t.id != id);
        if teams.len() == before {
            return Err(StoreError::not_found("teams", id));
        }
        Ok(())
    }

    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserRecord>> {
        self.begin_read();
        Ok(self.users.read().await.get(uid).cloned())
    }

    async fn create_user(&self, user: &UserRecord) -> StoreResult<UserRecord> {
        self.begin_write().await?;
        let mut users = self.users.write().await;
        if users.contains_key(&user.uid) {
            return Err(StoreError::Http {
                status: 409,
                message: format!("user {} already exists", user.uid),
            });
        }
        users.insert(user.uid.clone(), user.clone());
        Ok(user.clone())
    }

    async fn put_user(&self, uid: &str, user: &UserRecord) -> StoreResult<UserRecord> {
        self.begin_write().await?;
        let mut users = self.users.write().await;
        if !users.contains_key(uid) {
            return Err(StoreError::not_found("users", uid));
        }
        users.insert(uid.to_string(), user.clone());
        Ok(user.clone())
    }

    async fn delete_user(&self, uid: &str) -> StoreResult<()> {
        self.begin_write().await?;
        self.users
            .write()
            .await
            .remove(uid)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("users", uid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_models::Member;

    fn new_team(name: &str) -> NewTeam {
        NewTeam {
            id: None,
            name: name.into(),
            description: None,
            members: vec![Member::new("Ada")],
            projects: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_and_get_team() {
        let store = MemoryStore::new();
        let created = store.create_team(&new_team("Core")).await.unwrap();
        assert!(!created.id.is_empty());

        let fetched = store.get_team(&created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(store.list_teams().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_team_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_team("nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_patch_is_shallow() {
        let store = MemoryStore::new();
        let team = store.create_team(&new_team("Core")).await.unwrap();

        let patched = store
            .patch_team(
                &team.id,
                &TeamPatch {
                    name: Some("Platform".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(patched.name, "Platform");
        assert_eq!(patched.members, team.members);
        assert_eq!(store.patches().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failure_leaves_data_untouched() {
        let store = MemoryStore::new();
        let team = store.create_team(&new_team("Core")).await.unwrap();
        store.fail_next_write("backend down");

        let err = store
            .patch_team(&team.id, &TeamPatch::projects(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Injected(_)));
        assert!(store.patches().is_empty());
        assert_eq!(store.write_count(), 2);

        // plan consumed; the next write goes through
        store
            .patch_team(&team.id, &TeamPatch::projects(vec![]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let store = MemoryStore::new();
        assert_eq!(store.get_user("u1").await.unwrap(), None);

        let user = UserRecord {
            id: "u1".into(),
            uid: "u1".into(),
            email: None,
            display_name: Some("Ada".into()),
            photo_url: None,
            last_login_at: None,
        };
        store.create_user(&user).await.unwrap();
        assert!(store.create_user(&user).await.is_err());
        assert!(store.put_user("u1", &user).await.is_ok());
        store.delete_user("u1").await.unwrap();
        assert!(store.delete_user("u1").await.unwrap_err().is_not_found());
    }
}
