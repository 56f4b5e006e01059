//! The remote store seam

use async_trait::async_trait;
use kb_models::{NewTeam, Team, TeamPatch, UserRecord};

use crate::error::StoreResult;

/// Resource API of the backend.
///
/// Teams are the unit of persistence: projects, boards and cards are only
/// ever written as part of a `patch_team` call.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// `GET teams`
    async fn list_teams(&self) -> StoreResult<Vec<Team>>;

    /// `GET teams/{id}`
    async fn get_team(&self, id: &str) -> StoreResult<Team>;

    /// `POST teams`
    async fn create_team(&self, team: &NewTeam) -> StoreResult<Team>;

    /// `PATCH teams/{id}`
    async fn patch_team(&self, id: &str, patch: &TeamPatch) -> StoreResult<Team>;

    /// `DELETE teams/{id}`
    async fn delete_team(&self, id: &str) -> StoreResult<()>;

    /// `GET users/{uid}`; a missing record is `Ok(None)`
    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserRecord>>;

    /// `POST users`
    async fn create_user(&self, user: &UserRecord) -> StoreResult<UserRecord>;

    /// `PUT users/{uid}`
    async fn put_user(&self, uid: &str, user: &UserRecord) -> StoreResult<UserRecord>;

    /// `DELETE users/{uid}`
    async fn delete_user(&self, uid: &str) -> StoreResult<()>;
}
