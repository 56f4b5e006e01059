//! Shared test fixtures

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use kb_models::{Card, CardStatus, Member, NewTeam, Priority, Project, Team, TeamPatch, UserRecord};
use kb_store::{MemoryStore, RemoteStore, StoreResult};
use mockall::mock;

use crate::workspace::Workspace;

mock! {
    pub Store {}

    #[async_trait]
    impl RemoteStore for Store {
        async fn list_teams(&self) -> StoreResult<Vec<Team>>;
        async fn get_team(&self, id: &str) -> StoreResult<Team>;
        async fn create_team(&self, team: &NewTeam) -> StoreResult<Team>;
        async fn patch_team(&self, id: &str, patch: &TeamPatch) -> StoreResult<Team>;
        async fn delete_team(&self, id: &str) -> StoreResult<()>;
        async fn get_user(&self, uid: &str) -> StoreResult<Option<UserRecord>>;
        async fn create_user(&self, user: &UserRecord) -> StoreResult<UserRecord>;
        async fn put_user(&self, uid: &str, user: &UserRecord) -> StoreResult<UserRecord>;
        async fn delete_user(&self, uid: &str) -> StoreResult<()>;
    }
}

pub const TEAM_ID: &str = "t1";

pub fn ada() -> Member {
    Member {
        id: "m-ada".into(),
        name: "Ada".into(),
        email: Some("ada@example.com".into()),
        role: Some(Member::ROLE_MEMBER.into()),
    }
}

pub fn card(id: &str, status: CardStatus) -> Card {
    let mut card = Card::new(format!("Card {}", id), Priority::Medium)
        .with_status(status)
        .with_due_date(Utc.with_ymd_and_hms(2026, 12, 1, 0, 0, 0).unwrap());
    card.id = id.into();
    card
}

/// Project with `To Do = [A]`, `In Progress = []`, `Done = [B]`
pub fn project() -> Project {
    let mut project = Project::new(TEAM_ID, "Launch", "");
    project.board.columns[0].cards.push(card("A", CardStatus::Todo));
    project.board.columns[2].cards.push(card("B", CardStatus::Done));
    project.board.progress = 50;
    project
}

pub fn team(projects: Vec<Project>) -> Team {
    Team {
        id: TEAM_ID.into(),
        name: "Core".into(),
        description: None,
        members: vec![ada()],
        projects,
    }
}

/// Column ids of a project's board in display order
pub fn columns(project: &Project) -> (String, String, String) {
    let c = &project.board.columns;
    (c[0].id.clone(), c[1].id.clone(), c[2].id.clone())
}

/// Store and workspace holding the same team, with `project` selected
pub fn seeded(project: &Project) -> (Arc<MemoryStore>, Arc<Workspace>) {
    let store = Arc::new(MemoryStore::with_teams(vec![team(vec![project.clone()])]));
    let workspace = Arc::new(Workspace::new());
    workspace.add_team(team(vec![project.clone()]));
    workspace
        .select(&project.id)
        .expect("project was just added");
    (store, workspace)
}
