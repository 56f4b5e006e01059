//! Project contract

use kb_core::error::ValidationErrors;
use kb_models::{Board, Project, COLUMN_DONE, COLUMN_IN_PROGRESS, COLUMN_TODO};

use crate::base::{merge_derived, validate_name, Contract, ValidationResult};

/// Contract for creating a project
#[derive(Debug, Default)]
pub struct ProjectContract;

impl ProjectContract {
    pub fn new() -> Self {
        Self
    }

    /// A new board carries exactly the three fixed columns and no cards
    fn validate_board(&self, board: &Board, errors: &mut ValidationErrors) {
        let names: Vec<&str> = board.columns.iter().map(|c| c.name.as_str()).collect();
        if names != [COLUMN_TODO, COLUMN_IN_PROGRESS, COLUMN_DONE] {
            errors.add("board", "must have the columns To Do, In Progress and Done");
        }
        if board.card_count() > 0 {
            errors.add("board", "must start without cards");
        }
    }
}

impl Contract<Project> for ProjectContract {
    fn validate(&self, project: &Project) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if project.team_id.is_empty() {
            errors.add("team_id", "can't be blank");
        }
        validate_name("name", &project.name, &mut errors);
        self.validate_board(&project.board, &mut errors);
        merge_derived(project, &mut errors);

        errors.into_result()
    }
}
