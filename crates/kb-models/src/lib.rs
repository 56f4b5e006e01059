//! # kb-models
//!
//! Domain models for Kanban RS.
//!
//! These are the records exchanged with the remote store. The wire format is
//! camelCase JSON; status and priority values are closed enumerations, so an
//! unknown value is rejected while deserializing instead of being carried
//! around as an arbitrary string.

pub use kb_core::traits::{Entity, Id, Identifiable, TeamScoped};

pub mod member;
pub mod card;
pub mod board;
pub mod project;
pub mod team;
pub mod user;

pub use member::Member;
pub use card::{Card, CardStatus, Comment, Priority, Subtask};
pub use board::{Board, Column, COLUMN_DONE, COLUMN_IN_PROGRESS, COLUMN_TODO};
pub use project::{Project, ProjectStatus};
pub use team::{NewTeam, Team, TeamPatch};
pub use user::{AuthUser, UserRecord};

/// Fresh collision-resistant identifier for new records
pub fn new_id() -> Id {
    uuid::Uuid::new_v4().to_string()
}
