//! Project-level operations
//!
//! Projects have no resource of their own; every write reads the owning
//! team, edits its project list and PATCHes it back.

use kb_models::{Project, ProjectStatus, Team};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{StoreError, StoreResult};
use crate::store::RemoteStore;
use crate::teams::TeamGateway;

/// Partial project update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl ProjectPatch {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(status) = self.status {
            project.status = status;
        }
    }
}

pub struct ProjectGateway<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> ProjectGateway<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a project to its team and return the stored copy
    #[instrument(skip(self, project), fields(team_id = %project.team_id, project_id = %project.id))]
    pub async fn create_project(&self, project: &Project) -> StoreResult<Project> {
        let team = self.store.get_team(&project.team_id).await?;
        let mut projects = team.projects;
        projects.push(project.clone());

        let updated = TeamGateway::new(self.store)
            .patch_projects(&project.team_id, projects)
            .await?;
        let created = updated
            .projects
            .last()
            .cloned()
            .ok_or_else(|| StoreError::Decode("team came back without projects".into()))?;
        info!(project_id = %created.id, "project created");
        Ok(created)
    }

    pub async fn get_project(&self, team_id: &str, project_id: &str) -> StoreResult<Project> {
        let team = self.store.get_team(team_id).await?;
        find_project(&team, project_id).cloned()
    }

    /// Merge `patch` into the stored project and persist the team
    #[instrument(skip(self, patch))]
    pub async fn update_project(
        &self,
        team_id: &str,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> StoreResult<Project> {
        let team = self.store.get_team(team_id).await?;
        let mut project = find_project(&team, project_id)?.clone();
        patch.apply_to(&mut project);

        let projects = team.projects_with(&project);
        TeamGateway::new(self.store)
            .patch_projects(team_id, projects)
            .await?;
        Ok(project)
    }
}

fn find_project<'t>(team: &'t Team, project_id: &str) -> StoreResult<&'t Project> {
    team.project(project_id)
        .ok_or_else(|| StoreError::not_found("projects", project_id))
}
