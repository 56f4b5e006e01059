//! Workspace state
//!
//! Teams, projects and the selection held in normalized form: every project
//! lives once in a map keyed by id, teams only list project ids and the
//! selection is an id. A team with its nested `projects` array is rebuilt
//! from the map whenever it is read or persisted, so there is no second copy
//! of a project that could go stale.

use std::collections::HashMap;

use kb_core::{KbError, KbResult};
use kb_models::{Id, Project, ProjectStatus, Team};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// Why a project value was published
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishCause {
    /// Optimistic result of a board operation
    Optimistic,
    /// Snapshot restored after a failed remote write
    Rollback,
    StatusChange,
    Created,
    Selected,
    Updated,
}

/// Change notification for views
#[derive(Debug, Clone, PartialEq)]
pub enum WorkspaceEvent {
    TeamsReplaced { count: usize },
    TeamAdded { team_id: Id },
    ProjectPublished { project_id: Id, cause: PublishCause },
    SelectionChanged { project_id: Option<Id> },
}

/// Whether a published project is reachable from its owning team
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum SyncStatus {
    InSync,
    /// The value was stored but the owning team does not list it. Holds a
    /// [`KbError::SyncInconsistency`].
    Inconsistent(KbError),
}

impl SyncStatus {
    pub fn is_in_sync(&self) -> bool {
        matches!(self, SyncStatus::InSync)
    }

    pub fn into_result(self) -> KbResult<()> {
        match self {
            SyncStatus::InSync => Ok(()),
            SyncStatus::Inconsistent(err) => Err(err),
        }
    }
}

#[derive(Debug, Clone)]
struct TeamEntry {
    /// Team record with `projects` left empty
    team: Team,
    project_ids: Vec<Id>,
}

#[derive(Debug, Default)]
struct State {
    order: Vec<Id>,
    teams: HashMap<Id, TeamEntry>,
    projects: HashMap<Id, Project>,
    selected: Option<Id>,
}

impl State {
    fn assemble(&self, entry: &TeamEntry) -> Team {
        let mut team = entry.team.clone();
        team.projects = entry
            .project_ids
            .iter()
            .filter_map(|id| self.projects.get(id).cloned())
            .collect();
        team
    }

    fn insert_team(&mut self, mut team: Team) {
        let projects = std::mem::take(&mut team.projects);
        let project_ids: Vec<Id> = projects.iter().map(|p| p.id.clone()).collect();

        if let Some(previous) = self.teams.get(&team.id) {
            for stale in previous.project_ids.iter().filter(|id| !project_ids.contains(id)) {
                self.projects.remove(stale);
            }
        } else {
            self.order.push(team.id.clone());
        }

        for project in projects {
            self.projects.insert(project.id.clone(), project);
        }
        self.teams.insert(team.id.clone(), TeamEntry { team, project_ids });
    }

    fn sync_status(&self, project: &Project) -> SyncStatus {
        let listed = self
            .teams
            .get(&project.team_id)
            .map(|entry| entry.project_ids.contains(&project.id))
            .unwrap_or(false);
        if listed {
            SyncStatus::InSync
        } else {
            warn!(
                team_id = %project.team_id,
                project_id = %project.id,
                "project is not listed under its team"
            );
            SyncStatus::Inconsistent(KbError::SyncInconsistency {
                team_id: project.team_id.clone(),
                project_id: project.id.clone(),
            })
        }
    }
}

/// Shared application state
pub struct Workspace {
    state: RwLock<State>,
    events: broadcast::Sender<WorkspaceEvent>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: RwLock::new(State::default()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkspaceEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: WorkspaceEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Replace every team and project, e.g. after fetching from the store.
    /// The selection survives when its project is still present.
    pub fn replace_teams(&self, teams: Vec<Team>) {
        let count = teams.len();
        let selection_dropped = {
            let mut state = self.state.write();
            let selected = state.selected.take();
            let had_selection = selected.is_some();
            *state = State::default();
            for team in teams {
                state.insert_team(team);
            }
            let kept = selected.filter(|id| state.projects.contains_key(id));
            state.selected = kept;
            had_selection && state.selected.is_none()
        };
        debug!(count, "workspace teams replaced");
        self.emit(WorkspaceEvent::TeamsReplaced { count });
        if selection_dropped {
            self.emit(WorkspaceEvent::SelectionChanged { project_id: None });
        }
    }

    /// Add or replace one team together with its projects
    pub fn add_team(&self, team: Team) {
        let team_id = team.id.clone();
        self.state.write().insert_team(team);
        self.emit(WorkspaceEvent::TeamAdded { team_id });
    }

    /// Store a new project and list it under its team
    pub fn add_project(&self, project: Project) -> SyncStatus {
        let project_id = project.id.clone();
        let sync = {
            let mut state = self.state.write();
            if let Some(entry) = state.teams.get_mut(&project.team_id) {
                if !entry.project_ids.contains(&project.id) {
                    entry.project_ids.push(project.id.clone());
                }
            }
            let sync = state.sync_status(&project);
            state.projects.insert(project.id.clone(), project);
            sync
        };
        self.emit(WorkspaceEvent::ProjectPublished {
            project_id,
            cause: PublishCause::Created,
        });
        sync
    }

    /// Teams in insertion order, each with its projects reassembled
    pub fn teams(&self) -> Vec<Team> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|id| state.teams.get(id))
            .map(|entry| state.assemble(entry))
            .collect()
    }

    pub fn team(&self, team_id: &str) -> Option<Team> {
        let state = self.state.read();
        state.teams.get(team_id).map(|entry| state.assemble(entry))
    }

    pub fn project(&self, project_id: &str) -> Option<Project> {
        self.state.read().projects.get(project_id).cloned()
    }

    pub fn selected_id(&self) -> Option<Id> {
        self.state.read().selected.clone()
    }

    pub fn selected_project(&self) -> Option<Project> {
        let state = self.state.read();
        state
            .selected
            .as_ref()
            .and_then(|id| state.projects.get(id))
            .cloned()
    }

    /// Make `project` the working copy and select it
    pub fn set_selected_project(&self, project: Project) -> SyncStatus {
        let project_id = project.id.clone();
        let sync = self.publish(project, PublishCause::Selected);
        self.state.write().selected = Some(project_id.clone());
        self.emit(WorkspaceEvent::SelectionChanged {
            project_id: Some(project_id),
        });
        sync
    }

    /// Select a project already held by the workspace
    pub fn select(&self, project_id: &str) -> KbResult<()> {
        {
            let mut state = self.state.write();
            if !state.projects.contains_key(project_id) {
                return Err(KbError::not_found("project", "id", project_id));
            }
            state.selected = Some(project_id.to_string());
        }
        self.emit(WorkspaceEvent::SelectionChanged {
            project_id: Some(project_id.to_string()),
        });
        Ok(())
    }

    pub fn clear_selection(&self) {
        self.state.write().selected = None;
        self.emit(WorkspaceEvent::SelectionChanged { project_id: None });
    }

    /// Store a new value for a project. Selection and team views pick it up
    /// immediately since both resolve through the same map entry.
    pub fn publish(&self, project: Project, cause: PublishCause) -> SyncStatus {
        let project_id = project.id.clone();
        let sync = {
            let mut state = self.state.write();
            let sync = state.sync_status(&project);
            state.projects.insert(project.id.clone(), project);
            sync
        };
        self.emit(WorkspaceEvent::ProjectPublished { project_id, cause });
        sync
    }

    /// Set a project's status. Returns whether anything changed; repeating
    /// the same status is a no-op.
    pub fn update_project(&self, project_id: &str, status: ProjectStatus) -> KbResult<bool> {
        {
            let mut state = self.state.write();
            let project = state
                .projects
                .get_mut(project_id)
                .ok_or_else(|| KbError::not_found("project", "id", project_id))?;
            if project.status == status {
                return Ok(false);
            }
            project.status = status;
        }
        info!(project_id, status = status.as_str(), "project status changed");
        self.emit(WorkspaceEvent::ProjectPublished {
            project_id: project_id.to_string(),
            cause: PublishCause::StatusChange,
        });
        Ok(true)
    }
}
