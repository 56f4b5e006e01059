//! Team-level operations

use kb_models::{NewTeam, Project, Team, TeamPatch};
use tracing::{debug, instrument};

use crate::error::StoreResult;
use crate::store::RemoteStore;

/// Team operations on top of a [`RemoteStore`]
pub struct TeamGateway<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> TeamGateway<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> StoreResult<Vec<Team>> {
        let teams = self.store.list_teams().await?;
        debug!(count = teams.len(), "fetched teams");
        Ok(teams)
    }

    pub async fn get(&self, team_id: &str) -> StoreResult<Team> {
        self.store.get_team(team_id).await
    }

    pub async fn create(&self, team: &NewTeam) -> StoreResult<Team> {
        self.store.create_team(team).await
    }

    pub async fn delete(&self, team_id: &str) -> StoreResult<()> {
        self.store.delete_team(team_id).await
    }

    /// Replace the team's whole project list
    #[instrument(skip(self, projects), fields(projects = projects.len()))]
    pub async fn patch_projects(&self, team_id: &str, projects: Vec<Project>) -> StoreResult<Team> {
        self.store
            .patch_team(team_id, &TeamPatch::projects(projects))
            .await
    }
}
