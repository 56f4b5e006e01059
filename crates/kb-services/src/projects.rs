//! Project services

use async_trait::async_trait;
use kb_contracts::{validate_name, Contract, ProjectContract};
use kb_core::{KbError, ServiceResult, ValidationErrors};
use kb_models::{Id, Project};
use kb_store::{ProjectGateway, ProjectPatch, RemoteStore};
use tracing::info;

use crate::base::{Callable, ServiceContext};
use crate::workspace::PublishCause;

/// Input of the project form
#[derive(Debug, Clone, Default)]
pub struct ProjectParams {
    pub team_id: Id,
    pub name: String,
    pub description: String,
}

impl ProjectParams {
    pub fn new(team_id: impl Into<Id>) -> Self {
        Self {
            team_id: team_id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

fn store_failure<T>(err: kb_store::StoreError) -> ServiceResult<T> {
    ServiceResult::failure_with_message(KbError::from(err).to_string())
}

/// Creates a project with an empty three-column board
pub struct CreateProjectService<'a, S: RemoteStore + ?Sized> {
    context: &'a ServiceContext<S>,
}

impl<'a, S: RemoteStore + ?Sized> CreateProjectService<'a, S> {
    pub fn new(context: &'a ServiceContext<S>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl<'a, S: RemoteStore + ?Sized> Callable<ProjectParams, Project> for CreateProjectService<'a, S> {
    async fn call(&self, params: ProjectParams) -> ServiceResult<Project> {
        let workspace = self.context.workspace();
        if workspace.team(&params.team_id).is_none() {
            let mut errors = ValidationErrors::new();
            errors.add("team_id", "does not exist");
            return ServiceResult::failure(errors);
        }

        let project = Project::new(
            params.team_id,
            params.name.trim(),
            params.description.trim(),
        );
        if let Err(errors) = ProjectContract::new().validate(&project) {
            return ServiceResult::failure(errors);
        }

        let created = match ProjectGateway::new(self.context.store().as_ref())
            .create_project(&project)
            .await
        {
            Ok(created) => created,
            Err(err) => return store_failure(err),
        };

        info!(team_id = %created.team_id, project_id = %created.id, "project created");
        let _ = workspace.add_project(created.clone());
        ServiceResult::success(created)
    }
}

/// Applies a [`ProjectPatch`] remotely, then to the workspace
pub struct UpdateProjectService<'a, S: RemoteStore + ?Sized> {
    context: &'a ServiceContext<S>,
}

impl<'a, S: RemoteStore + ?Sized> UpdateProjectService<'a, S> {
    pub fn new(context: &'a ServiceContext<S>) -> Self {
        Self { context }
    }

    pub async fn call(&self, project_id: &str, patch: ProjectPatch) -> ServiceResult<Project> {
        let workspace = self.context.workspace();
        let Some(project) = workspace.project(project_id) else {
            return ServiceResult::failure_with_message(
                KbError::not_found("project", "id", project_id).to_string(),
            );
        };

        let mut errors = ValidationErrors::new();
        if let Some(name) = &patch.name {
            validate_name("name", name, &mut errors);
        }
        if !errors.is_empty() {
            return ServiceResult::failure(errors);
        }

        if let Err(err) = ProjectGateway::new(self.context.store().as_ref())
            .update_project(&project.team_id, project_id, &patch)
            .await
        {
            return store_failure(err);
        }

        if patch.name.is_some() || patch.description.is_some() {
            let mut next = project;
            ProjectPatch {
                status: None,
                ..patch.clone()
            }
            .apply_to(&mut next);
            let _ = workspace.publish(next, PublishCause::Updated);
        }
        if let Some(status) = patch.status {
            if let Err(err) = workspace.update_project(project_id, status) {
                return ServiceResult::failure_with_message(err.to_string());
            }
        }

        match workspace.project(project_id) {
            Some(project) => ServiceResult::success(project),
            None => ServiceResult::failure_with_message("project vanished during update"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, TEAM_ID};
    use kb_core::config::EngineConfig;
    use kb_models::ProjectStatus;
    use kb_store::MemoryStore;
    use std::sync::Arc;

    fn context() -> ServiceContext<MemoryStore> {
        let store = Arc::new(MemoryStore::with_teams(vec![testing::team(vec![])]));
        let context = ServiceContext::new(store, EngineConfig::default());
        context.workspace().add_team(testing::team(vec![]));
        context
    }

    #[tokio::test]
    async fn test_create_project() {
        let context = context();
        let result = CreateProjectService::new(&context)
            .call(ProjectParams::new(TEAM_ID).with_name(" Launch ").with_description("Q4"))
            .await;

        let project = result.into_result().unwrap();
        assert_eq!(project.name, "Launch");
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.board.progress, 0);
        let names: Vec<&str> = project.board.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["To Do", "In Progress", "Done"]);

        assert_eq!(context.workspace().team(TEAM_ID).unwrap().projects, vec![project.clone()]);
        assert_eq!(context.store().team(TEAM_ID).await.unwrap().projects, vec![project]);
    }

    #[tokio::test]
    async fn test_create_project_validation() {
        let context = context();
        let result = CreateProjectService::new(&context)
            .call(ProjectParams::new(TEAM_ID).with_name("   "))
            .await;
        assert!(result.errors().has_error("name"));

        let result = CreateProjectService::new(&context)
            .call(ProjectParams::new("ghost").with_name("Launch"))
            .await;
        assert!(result.errors().has_error("team_id"));
        assert_eq!(context.store().write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_project_status_and_name() {
        let context = context();
        let project = CreateProjectService::new(&context)
            .call(ProjectParams::new(TEAM_ID).with_name("Launch"))
            .await
            .into_result()
            .unwrap();

        let patch = ProjectPatch {
            name: Some("Relaunch".into()),
            status: Some(ProjectStatus::Archived),
            ..Default::default()
        };
        let updated = UpdateProjectService::new(&context)
            .call(&project.id, patch)
            .await
            .into_result()
            .unwrap();
        assert_eq!(updated.name, "Relaunch");
        assert_eq!(updated.status, ProjectStatus::Archived);

        let stored = context.store().team(TEAM_ID).await.unwrap().projects[0].clone();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_workspace_alone() {
        let context = context();
        let project = CreateProjectService::new(&context)
            .call(ProjectParams::new(TEAM_ID).with_name("Launch"))
            .await
            .into_result()
            .unwrap();
        context.store().fail_next_write("offline");

        let result = UpdateProjectService::new(&context)
            .call(&project.id, ProjectPatch::status(ProjectStatus::Completed))
            .await;
        assert!(result.is_failure());
        assert_eq!(context.workspace().project(&project.id), Some(project));
    }
}
