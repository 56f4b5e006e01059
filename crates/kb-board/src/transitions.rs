//! Board transitions
//!
//! Each operation either changes the board (and then progress is
//! recomputed in the same step) or leaves it untouched with a [`Skip`]
//! describing why. Skips are not errors: a stale drag that references a card
//! which already moved is expected in normal use.

use kb_models::{Card, Id, Project};
use serde::{Deserialize, Serialize};

use crate::progress::{recompute, Completion};

/// A board mutation requested by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BoardOp {
    MoveCard {
        card_id: Id,
        source_column_id: Id,
        target_column_id: Id,
    },
    AddCard { column_id: Id, card: Card },
    DeleteCard { card_id: Id, column_id: Id },
    UpdateCard { column_id: Id, card: Card },
}

impl BoardOp {
    pub fn move_card(card_id: impl Into<Id>, source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self::MoveCard {
            card_id: card_id.into(),
            source_column_id: source.into(),
            target_column_id: target.into(),
        }
    }

    pub fn add_card(column_id: impl Into<Id>, card: Card) -> Self {
        Self::AddCard {
            column_id: column_id.into(),
            card,
        }
    }

    pub fn delete_card(card_id: impl Into<Id>, column_id: impl Into<Id>) -> Self {
        Self::DeleteCard {
            card_id: card_id.into(),
            column_id: column_id.into(),
        }
    }

    pub fn update_card(column_id: impl Into<Id>, card: Card) -> Self {
        Self::UpdateCard {
            column_id: column_id.into(),
            card,
        }
    }

    /// Operation name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::MoveCard { .. } => "move_card",
            Self::AddCard { .. } => "add_card",
            Self::DeleteCard { .. } => "delete_card",
            Self::UpdateCard { .. } => "update_card",
        }
    }

    pub fn card_id(&self) -> &str {
        match self {
            Self::MoveCard { card_id, .. } | Self::DeleteCard { card_id, .. } => card_id,
            Self::AddCard { card, .. } | Self::UpdateCard { card, .. } => &card.id,
        }
    }
}

/// Why an operation left the board untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// Source and target column are the same
    SameColumn,
    ColumnNotFound { column_id: Id },
    CardNotFound { card_id: Id, column_id: Id },
    /// Adding would put a second card with this id on the board
    DuplicateCard { card_id: Id },
}

impl std::fmt::Display for Skip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Skip::SameColumn => write!(f, "source and target column are the same"),
            Skip::ColumnNotFound { column_id } => write!(f, "column {} not found", column_id),
            Skip::CardNotFound { card_id, column_id } => {
                write!(f, "card {} not found in column {}", card_id, column_id)
            }
            Skip::DuplicateCard { card_id } => write!(f, "card {} already on the board", card_id),
        }
    }
}

/// Result of applying an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed(Completion),
    Unchanged(Skip),
}

impl Outcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed(_))
    }

    pub fn completed(&self) -> bool {
        matches!(self, Outcome::Changed(Completion::Completed))
    }
}

/// Next project value together with what happened
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub project: Project,
    pub outcome: Outcome,
}

/// Apply an operation to a project value, returning the next value.
pub fn apply(project: &Project, op: &BoardOp) -> Transition {
    let mut next = project.clone();
    let result = match op {
        BoardOp::MoveCard {
            card_id,
            source_column_id,
            target_column_id,
        } => move_card(&mut next, card_id, source_column_id, target_column_id),
        BoardOp::AddCard { column_id, card } => add_card(&mut next, column_id, card.clone()),
        BoardOp::DeleteCard { card_id, column_id } => delete_card(&mut next, card_id, column_id),
        BoardOp::UpdateCard { column_id, card } => update_card(&mut next, column_id, card.clone()),
    };

    let outcome = match result {
        Ok(()) => Outcome::Changed(recompute(&mut next)),
        Err(skip) => {
            next = project.clone();
            Outcome::Unchanged(skip)
        }
    };
    Transition {
        project: next,
        outcome,
    }
}

/// Transfer a card between columns, rewriting its status for the target.
fn move_card(project: &mut Project, card_id: &str, source: &str, target: &str) -> Result<(), Skip> {
    if source == target {
        return Err(Skip::SameColumn);
    }
    let board = &mut project.board;
    let target_status = board
        .column(target)
        .map(|c| c.derived_status())
        .ok_or_else(|| Skip::ColumnNotFound {
            column_id: target.to_string(),
        })?;

    let source_column = board.column_mut(source).ok_or_else(|| Skip::ColumnNotFound {
        column_id: source.to_string(),
    })?;
    let position = source_column
        .position(card_id)
        .ok_or_else(|| Skip::CardNotFound {
            card_id: card_id.to_string(),
            column_id: source.to_string(),
        })?;
    let mut card = source_column.cards.remove(position);
    card.status = target_status;

    // Target existence was checked above and columns are not removed in between.
    if let Some(target_column) = board.column_mut(target) {
        target_column.cards.push(card);
    }
    Ok(())
}

/// Append a card to a column; its status always follows the column name.
fn add_card(project: &mut Project, column_id: &str, mut card: Card) -> Result<(), Skip> {
    if project.board.column_of(&card.id).is_some() {
        return Err(Skip::DuplicateCard { card_id: card.id });
    }
    let column = project
        .board
        .column_mut(column_id)
        .ok_or_else(|| Skip::ColumnNotFound {
            column_id: column_id.to_string(),
        })?;
    card.status = column.derived_status();
    column.cards.push(card);
    Ok(())
}

fn delete_card(project: &mut Project, card_id: &str, column_id: &str) -> Result<(), Skip> {
    let column = project
        .board
        .column_mut(column_id)
        .ok_or_else(|| Skip::ColumnNotFound {
            column_id: column_id.to_string(),
        })?;
    let position = column.position(card_id).ok_or_else(|| Skip::CardNotFound {
        card_id: card_id.to_string(),
        column_id: column_id.to_string(),
    })?;
    column.cards.remove(position);
    Ok(())
}

/// Replace a card in place. The caller's status is kept as given.
fn update_card(project: &mut Project, column_id: &str, card: Card) -> Result<(), Skip> {
    let column = project
        .board
        .column_mut(column_id)
        .ok_or_else(|| Skip::ColumnNotFound {
            column_id: column_id.to_string(),
        })?;
    let position = column.position(&card.id).ok_or_else(|| Skip::CardNotFound {
        card_id: card.id.clone(),
        column_id: column_id.to_string(),
    })?;
    column.cards[position] = card;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_models::{CardStatus, Priority, ProjectStatus};

    struct Fixture {
        project: Project,
        todo: Id,
        doing: Id,
        done: Id,
    }

    fn fixture() -> Fixture {
        let project = Project::new("t1", "Launch", "");
        let todo = project.board.columns[0].id.clone();
        let doing = project.board.columns[1].id.clone();
        let done = project.board.columns[2].id.clone();
        Fixture {
            project,
            todo,
            doing,
            done,
        }
    }

    fn card(id: &str, status: CardStatus) -> Card {
        let mut card = Card::new(id, Priority::Low).with_status(status);
        card.id = id.to_string();
        card
    }

    #[test]
    fn test_move_last_open_card_to_done() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        f.project.board.columns[2].cards.push(card("B", CardStatus::Done));

        let t = apply(&f.project, &BoardOp::move_card("A", &f.todo, &f.done));

        assert_eq!(t.outcome, Outcome::Changed(Completion::Completed));
        assert!(t.project.board.columns[0].cards.is_empty());
        let done_ids: Vec<_> = t.project.board.columns[2].cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(done_ids, vec!["B", "A"]);
        assert_eq!(t.project.board.columns[2].cards[1].status, CardStatus::Done);
        assert_eq!(t.project.board.progress, 100);
        assert_eq!(t.project.status, ProjectStatus::Completed);
        // the input value is untouched
        assert_eq!(f.project.board.columns[0].cards.len(), 1);
    }

    #[test]
    fn test_move_to_same_column_is_noop() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        let t = apply(&f.project, &BoardOp::move_card("A", &f.todo, &f.todo));
        assert_eq!(t.outcome, Outcome::Unchanged(Skip::SameColumn));
        assert_eq!(t.project, f.project);
    }

    #[test]
    fn test_stale_move_is_noop() {
        let mut f = fixture();
        f.project.board.columns[1].cards.push(card("A", CardStatus::InProgress));
        let t = apply(&f.project, &BoardOp::move_card("A", &f.todo, &f.done));
        assert!(matches!(t.outcome, Outcome::Unchanged(Skip::CardNotFound { .. })));
        assert_eq!(t.project, f.project);
    }

    #[test]
    fn test_move_to_unknown_column_keeps_card() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        let t = apply(&f.project, &BoardOp::move_card("A", &f.todo, "nope"));
        assert!(matches!(t.outcome, Outcome::Unchanged(Skip::ColumnNotFound { .. })));
        assert_eq!(t.project.board.columns[0].cards.len(), 1);
    }

    #[test]
    fn test_move_rewrites_status_for_in_progress() {
        let mut f = fixture();
        f.project.board.columns[2].cards.push(card("A", CardStatus::Done));
        let t = apply(&f.project, &BoardOp::move_card("A", &f.done, &f.doing));
        assert_eq!(t.project.board.columns[1].cards[0].status, CardStatus::InProgress);
        assert_eq!(t.project.board.progress, 0);
    }

    #[test]
    fn test_add_card_into_done_derives_status() {
        let f = fixture();
        let mut new_card = Card::new("Y", Priority::Low);
        new_card.id = "x".into();
        let t = apply(&f.project, &BoardOp::add_card(&f.done, new_card));
        let added = &t.project.board.columns[2].cards[0];
        assert_eq!(added.id, "x");
        assert_eq!(added.status, CardStatus::Done);
        assert!(t.outcome.completed());
    }

    #[test]
    fn test_add_card_into_todo_overrides_caller_status() {
        let f = fixture();
        let t = apply(&f.project, &BoardOp::add_card(&f.todo, card("x", CardStatus::Done)));
        assert_eq!(t.project.board.columns[0].cards[0].status, CardStatus::Todo);
        assert_eq!(t.project.board.progress, 0);
    }

    #[test]
    fn test_add_duplicate_id_is_noop() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        let t = apply(&f.project, &BoardOp::add_card(&f.done, card("A", CardStatus::Todo)));
        assert_eq!(
            t.outcome,
            Outcome::Unchanged(Skip::DuplicateCard { card_id: "A".into() })
        );
        assert_eq!(t.project.board.card_count(), 1);
    }

    #[test]
    fn test_delete_missing_card_is_noop() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        let t = apply(&f.project, &BoardOp::delete_card("missing-id", &f.todo));
        assert!(!t.outcome.is_changed());
        assert_eq!(t.project, f.project);
    }

    #[test]
    fn test_delete_recomputes_progress() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        f.project.board.columns[2].cards.push(card("B", CardStatus::Done));
        f.project.board.progress = 50;
        let t = apply(&f.project, &BoardOp::delete_card("A", &f.todo));
        assert_eq!(t.project.board.progress, 100);
        assert_eq!(t.project.status, ProjectStatus::Completed);
    }

    #[test]
    fn test_update_card_in_place() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        f.project.board.columns[0].cards.push(card("B", CardStatus::Todo));

        let mut edited = card("A", CardStatus::Todo);
        edited.name = "Renamed".into();
        edited.priority = Priority::High;
        let t = apply(&f.project, &BoardOp::update_card(&f.todo, edited));

        let cards = &t.project.board.columns[0].cards;
        assert_eq!(cards[0].name, "Renamed");
        assert_eq!(cards[0].priority, Priority::High);
        assert_eq!(cards[1].id, "B");
    }

    #[test]
    fn test_update_card_trusts_caller_status() {
        let mut f = fixture();
        f.project.board.columns[0].cards.push(card("A", CardStatus::Todo));
        let t = apply(&f.project, &BoardOp::update_card(&f.todo, card("A", CardStatus::Done)));
        assert_eq!(t.project.board.columns[0].cards[0].status, CardStatus::Done);
        assert_eq!(t.project.board.progress, 100);
    }

    #[test]
    fn test_update_missing_card_is_noop() {
        let f = fixture();
        let t = apply(&f.project, &BoardOp::update_card(&f.doing, card("ghost", CardStatus::Todo)));
        assert!(matches!(t.outcome, Outcome::Unchanged(Skip::CardNotFound { .. })));
    }

    #[test]
    fn test_op_wire_format() {
        let op = BoardOp::move_card("c1", "s", "t");
        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["op"], "move_card");
        assert_eq!(value["target_column_id"], "t");
        assert_eq!(op.card_id(), "c1");
    }
}
