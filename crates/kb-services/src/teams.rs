//! Team services

use async_trait::async_trait;
use kb_contracts::{Contract, TeamContract};
use kb_core::{KbError, KbResult, ServiceResult};
use kb_models::{Member, NewTeam, Team};
use kb_store::{RemoteStore, TeamGateway};
use tracing::info;

use crate::base::{Callable, ServiceContext};

/// Input of the team form
#[derive(Debug, Clone, Default)]
pub struct TeamParams {
    pub name: String,
    pub description: Option<String>,
    pub member_names: Vec<String>,
}

impl TeamParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.member_names.push(name.into());
        self
    }

    /// Team payload with trimmed fields and one fresh member per name
    fn into_new_team(self) -> NewTeam {
        NewTeam {
            id: None,
            name: self.name.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            members: self
                .member_names
                .iter()
                .map(|n| n.trim())
                .filter(|n| !n.is_empty())
                .map(Member::new)
                .collect(),
            projects: Vec::new(),
        }
    }
}

/// Creates a team remotely and adds it to the workspace
pub struct CreateTeamService<'a, S: RemoteStore + ?Sized> {
    context: &'a ServiceContext<S>,
}

impl<'a, S: RemoteStore + ?Sized> CreateTeamService<'a, S> {
    pub fn new(context: &'a ServiceContext<S>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl<'a, S: RemoteStore + ?Sized> Callable<TeamParams, Team> for CreateTeamService<'a, S> {
    async fn call(&self, params: TeamParams) -> ServiceResult<Team> {
        let new_team = params.into_new_team();
        if let Err(errors) = TeamContract::new().validate(&new_team) {
            return ServiceResult::failure(errors);
        }

        let team = match TeamGateway::new(self.context.store().as_ref())
            .create(&new_team)
            .await
        {
            Ok(team) => team,
            Err(err) => return ServiceResult::failure_with_message(KbError::from(err).to_string()),
        };

        info!(team_id = %team.id, members = team.members.len(), "team created");
        self.context.workspace().add_team(team.clone());
        ServiceResult::success(team)
    }
}

/// Loads every team into the workspace
pub struct FetchTeamsService<'a, S: RemoteStore + ?Sized> {
    context: &'a ServiceContext<S>,
}

impl<'a, S: RemoteStore + ?Sized> FetchTeamsService<'a, S> {
    pub fn new(context: &'a ServiceContext<S>) -> Self {
        Self { context }
    }

    pub async fn call(&self) -> KbResult<Vec<Team>> {
        let teams = TeamGateway::new(self.context.store().as_ref()).list().await?;
        self.context.workspace().replace_teams(teams.clone());
        Ok(teams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_core::config::EngineConfig;
    use kb_store::MemoryStore;
    use std::sync::Arc;

    fn context() -> ServiceContext<MemoryStore> {
        ServiceContext::new(Arc::new(MemoryStore::new()), EngineConfig::default())
    }

    #[tokio::test]
    async fn test_create_team() {
        let context = context();
        let params = TeamParams::new()
            .with_name("  Core ")
            .with_description("platform")
            .with_member("Ada")
            .with_member("  ")
            .with_member("Grace");

        let result = CreateTeamService::new(&context).call(params).await;
        assert!(result.is_success());
        let team = result.into_result().unwrap();
        assert_eq!(team.name, "Core");
        assert_eq!(team.members.len(), 2);
        assert!(team
            .members
            .iter()
            .all(|m| m.role.as_deref() == Some(Member::ROLE_MEMBER) && m.email.as_deref() == Some("")));
        assert_ne!(team.members[0].id, team.members[1].id);

        assert_eq!(context.workspace().team(&team.id), Some(team.clone()));
        assert!(context.store().team(&team.id).await.is_some());
    }

    #[tokio::test]
    async fn test_create_team_requires_name_and_member() {
        let context = context();
        let result = CreateTeamService::new(&context)
            .call(TeamParams::new().with_member(" "))
            .await;

        assert!(result.is_failure());
        assert!(result.errors().has_error("name"));
        assert!(result.errors().has_error("members"));
        assert_eq!(context.store().write_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let context = context();
        context.store().fail_next_write("offline");

        let result = CreateTeamService::new(&context)
            .call(TeamParams::new().with_name("Core").with_member("Ada"))
            .await;
        assert!(result.is_failure());
        assert_eq!(result.errors().base_errors.len(), 1);
        assert!(context.workspace().teams().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_teams_replaces_workspace() {
        let context = context();
        CreateTeamService::new(&context)
            .call(TeamParams::new().with_name("Core").with_member("Ada"))
            .await
            .into_result()
            .unwrap();

        let fresh = ServiceContext::new(context.store().clone(), EngineConfig::default());
        let teams = FetchTeamsService::new(&fresh).call().await.unwrap();
        assert_eq!(teams.len(), 1);
        assert_eq!(fresh.workspace().teams(), teams);
    }
}
