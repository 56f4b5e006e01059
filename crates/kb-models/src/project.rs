//! Project model

use kb_core::traits::{Id, Identifiable, TeamScoped};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::board::Board;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

/// Project entity
///
/// A project belongs to exactly one team (`team_id` is a back-reference)
/// and owns exactly one board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Id,

    pub team_id: Id,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub status: ProjectStatus,

    pub board: Board,
}

impl Project {
    /// New active project with a fresh id and a board with the fixed columns
    pub fn new(team_id: impl Into<Id>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            team_id: team_id.into(),
            name: name.into(),
            description: description.into(),
            status: ProjectStatus::Active,
            board: Board::with_default_columns(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ProjectStatus::Completed
    }
}

impl Identifiable for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl TeamScoped for Project {
    fn team_id(&self) -> &str {
        &self.team_id
    }
}
