//! Card contract
//!
//! Applied to a card before it is added to or replaced on a board.

use kb_core::error::ValidationErrors;
use kb_models::{Card, Team};

use crate::base::{merge_derived, validate_name, Contract, ValidationResult};

/// Contract for cards created or edited through the card form
pub struct CardContract<'a> {
    team: &'a Team,
    require_due_date: bool,
}

impl<'a> CardContract<'a> {
    pub fn new(team: &'a Team) -> Self {
        Self {
            team,
            require_due_date: true,
        }
    }

    /// Accept cards without a due date (imports, programmatic edits)
    pub fn allow_missing_due_date(mut self) -> Self {
        self.require_due_date = false;
        self
    }

    fn validate_assignee(&self, card: &Card, errors: &mut ValidationErrors) {
        if let Some(assignee_id) = card.assignee_id() {
            if self.team.member(assignee_id).is_none() {
                errors.add("assignee", "is not a member of the team");
            }
        }
    }
}

impl<'a> Contract<Card> for CardContract<'a> {
    fn validate(&self, card: &Card) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        if card.id.is_empty() {
            errors.add("id", "can't be blank");
        }
        validate_name("name", &card.name, &mut errors);
        if self.require_due_date && card.due_date.is_none() {
            errors.add("due_date", "can't be blank");
        }
        self.validate_assignee(card, &mut errors);
        merge_derived(card, &mut errors);

        errors.into_result()
    }
}
