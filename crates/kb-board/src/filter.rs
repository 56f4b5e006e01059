//! Board filter
//!
//! A read-only view over a board. When any criterion is set, a card is shown
//! if it matches at least one of them.

use kb_models::{Board, Card, Column, Id, Priority};
use serde::{Deserialize, Serialize};

const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeFilter {
    #[default]
    All,
    Member(Id),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardFilter {
    pub priority: PriorityFilter,
    pub assignee: AssigneeFilter,
}

impl BoardFilter {
    /// Build from the select values used by the filter controls:
    /// `"all"` or a priority name, and `"all"` or a member id.
    pub fn from_selection(priority: &str, assignee: &str) -> Self {
        let priority = if priority.eq_ignore_ascii_case(ALL) {
            PriorityFilter::All
        } else {
            priority
                .parse::<Priority>()
                .map(PriorityFilter::Only)
                .unwrap_or_default()
        };
        let assignee = if assignee == ALL || assignee.is_empty() {
            AssigneeFilter::All
        } else {
            AssigneeFilter::Member(assignee.to_string())
        };
        Self { priority, assignee }
    }

    pub fn is_empty(&self) -> bool {
        self.priority == PriorityFilter::All && self.assignee == AssigneeFilter::All
    }

    /// Reset both criteria
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn matches(&self, card: &Card) -> bool {
        if self.is_empty() {
            return true;
        }
        let priority_match = matches!(self.priority, PriorityFilter::Only(p) if p == card.priority);
        let assignee_match = match &self.assignee {
            AssigneeFilter::Member(id) => card.assignee_id() == Some(id.as_str()),
            AssigneeFilter::All => false,
        };
        priority_match || assignee_match
    }

    /// Filtered copy of the board's columns; column order and ids are kept.
    pub fn apply(&self, board: &Board) -> Vec<Column> {
        board
            .columns
            .iter()
            .map(|column| Column {
                id: column.id.clone(),
                name: column.name.clone(),
                cards: column
                    .cards
                    .iter()
                    .filter(|card| self.matches(card))
                    .cloned()
                    .collect(),
            })
            .collect()
    }
}
