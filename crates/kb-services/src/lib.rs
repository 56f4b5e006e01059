//! # kb-services
//!
//! Application layer for Kanban RS.
//!
//! [`Workspace`] is the explicit state container: teams, projects and the
//! selection, kept normalized so that the selected project and the owning
//! team's copy can never drift apart. [`BoardEngine`] runs card mutations
//! optimistically against it and rolls them back when the remote write
//! fails. The remaining services create teams and projects and mirror the
//! signed-in user.

pub mod base;
pub mod workspace;
pub mod engine;
pub mod teams;
pub mod projects;
pub mod session;

pub use base::{Callable, ServiceContext};
pub use workspace::{PublishCause, SyncStatus, Workspace, WorkspaceEvent};
pub use engine::{Ack, BoardEngine, Pending};
pub use teams::{CreateTeamService, FetchTeamsService, TeamParams};
pub use projects::{CreateProjectService, ProjectParams, UpdateProjectService};
pub use session::{IdentityEvent, SessionService, SessionState};

#[cfg(test)]
mod testing;
