//! Board invariant checks
//!
//! Used by tests and by the engine in debug builds after every publish.

use std::collections::HashMap;

use kb_models::{CardStatus, Id, Project};

use crate::progress::compute_progress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The same card id sits in more than one place
    DuplicateCard { card_id: Id, occurrences: usize },
    /// A card's status disagrees with its column
    StatusMismatch {
        card_id: Id,
        column: String,
        status: CardStatus,
    },
    /// Stored progress differs from the computed value
    StaleProgress { stored: u8, expected: u8 },
}

/// Collect every invariant violation on a project's board.
pub fn audit(project: &Project) -> Vec<Violation> {
    let mut violations = Vec::new();
    let board = &project.board;

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for card in board.cards() {
        *seen.entry(card.id.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    duplicates.sort();
    violations.extend(duplicates.into_iter().map(|(id, n)| Violation::DuplicateCard {
        card_id: id.to_string(),
        occurrences: n,
    }));

    for column in &board.columns {
        let expected = column.derived_status();
        for card in column.cards.iter().filter(|c| c.status != expected) {
            violations.push(Violation::StatusMismatch {
                card_id: card.id.clone(),
                column: column.name.clone(),
                status: card.status,
            });
        }
    }

    let expected = compute_progress(board);
    if board.progress != expected {
        violations.push(Violation::StaleProgress {
            stored: board.progress,
            expected,
        });
    }

    violations
}
