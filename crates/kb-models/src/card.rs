//! Card model
//!
//! A card is the unit of work on a board. It lives in exactly one column and
//! its `status` mirrors that column's name.

use chrono::{DateTime, Utc};
use kb_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::board::{COLUMN_IN_PROGRESS, COLUMN_TODO};
use crate::member::Member;

/// Card status, derived from the containing column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CardStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl CardStatus {
    /// Status of a card placed in a column with this name.
    ///
    /// Only the two fixed names map to open statuses; any other column
    /// counts as done.
    pub fn for_column_name(name: &str) -> Self {
        match name {
            COLUMN_TODO => Self::Todo,
            COLUMN_IN_PROGRESS => Self::InProgress,
            _ => Self::Done,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Card priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = kb_core::KbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                kb_core::KbError::Contract(kb_core::ContractError::AttributeInvalid {
                    attribute: "priority".into(),
                    message: format!("unknown priority '{}'", s),
                })
            })
    }
}

/// Comment on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Id,
    pub content: String,
    pub author: Member,
}

/// Checklist entry on a card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub status: CardStatus,
}

/// Card entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Id,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: CardStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Member>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<Subtask>,
}

impl Card {
    /// New card with a fresh id
    pub fn new(name: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: crate::new_id(),
            name: name.into(),
            description: None,
            status: CardStatus::Todo,
            due_date: None,
            assignee: None,
            priority,
            tags: Vec::new(),
            comments: Vec::new(),
            subtasks: Vec::new(),
        }
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_assignee(mut self, assignee: Member) -> Self {
        self.assignee = Some(assignee);
        self
    }

    pub fn with_status(mut self, status: CardStatus) -> Self {
        self.status = status;
        self
    }

    pub fn assignee_id(&self) -> Option<&str> {
        self.assignee.as_ref().map(|m| m.id.as_str())
    }

    /// Card as submitted from the form: trimmed name and description,
    /// blank description dropped, blank tags removed
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.tags = self
            .tags
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }
}

impl Identifiable for Card {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_column_name() {
        assert_eq!(CardStatus::for_column_name("To Do"), CardStatus::Todo);
        assert_eq!(CardStatus::for_column_name("In Progress"), CardStatus::InProgress);
        assert_eq!(CardStatus::for_column_name("Done"), CardStatus::Done);
        assert_eq!(CardStatus::for_column_name("Shipped"), CardStatus::Done);
    }

    #[test]
    fn test_normalized_trims_form_input() {
        let mut card = Card::new("  Write docs ", Priority::Low);
        card.description = Some("   ".into());
        card.tags = vec![" docs".into(), "".into(), "api ".into()];

        let card = card.normalized();
        assert_eq!(card.name, "Write docs");
        assert_eq!(card.description, None);
        assert_eq!(card.tags, vec!["docs", "api"]);
    }

    #[test]
    fn test_card_wire_format() {
        let json = r#"{
            "id": "c1",
            "name": "Write docs",
            "status": "in_progress",
            "dueDate": "2026-11-01T00:00:00Z",
            "priority": "high",
            "tags": ["docs"]
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.status, CardStatus::InProgress);
        assert_eq!(card.priority, Priority::High);
        assert!(card.due_date.is_some());

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["dueDate"], "2026-11-01T00:00:00Z");
        assert!(value.get("assignee").is_none());
    }

    #[test]
    fn test_unknown_enum_values_rejected() {
        let bad_status = r#"{"id":"c1","name":"x","status":"blocked","priority":"low"}"#;
        assert!(serde_json::from_str::<Card>(bad_status).is_err());

        let bad_priority = r#"{"id":"c1","name":"x","status":"todo","priority":"urgent"}"#;
        assert!(serde_json::from_str::<Card>(bad_priority).is_err());
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
        let err = "all".parse::<Priority>().unwrap_err();
        assert!(matches!(
            err,
            kb_core::KbError::Contract(kb_core::ContractError::AttributeInvalid { ref attribute, .. })
                if attribute == "priority"
        ));
    }
}
