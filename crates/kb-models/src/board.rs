//! Board and column models

use kb_core::traits::{Id, Identifiable};
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardStatus};

/// Fixed column names created with every board
pub const COLUMN_TODO: &str = "To Do";
pub const COLUMN_IN_PROGRESS: &str = "In Progress";
pub const COLUMN_DONE: &str = "Done";

/// Column of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: crate::new_id(),
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// Status every card in this column carries
    pub fn derived_status(&self) -> CardStatus {
        CardStatus::for_column_name(&self.name)
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn position(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

impl Identifiable for Column {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Board of a project: its columns and completion percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Id,
    /// Percentage of done cards, 0..=100
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    /// Board with the three fixed columns and no cards
    pub fn with_default_columns() -> Self {
        Self {
            id: crate::new_id(),
            progress: 0,
            columns: vec![
                Column::new(COLUMN_TODO),
                Column::new(COLUMN_IN_PROGRESS),
                Column::new(COLUMN_DONE),
            ],
        }
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_mut(&mut self, column_id: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == column_id)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All cards across columns, in column order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.columns.iter().flat_map(|c| c.cards.iter())
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    pub fn done_count(&self) -> usize {
        self.cards().filter(|c| c.status.is_done()).count()
    }

    /// Column currently holding the card
    pub fn column_of(&self, card_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.card(card_id).is_some())
    }
}

impl Identifiable for Board {
    fn id(&self) -> &str {
        &self.id
    }
}
