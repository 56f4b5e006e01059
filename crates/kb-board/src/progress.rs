//! Progress computation and the completion transition

use kb_models::{Board, Project, ProjectStatus};

/// Percentage of done cards, rounded half away from zero; 0 for an empty board
pub fn compute_progress(board: &Board) -> u8 {
    let total = board.card_count();
    if total == 0 {
        return 0;
    }
    let done = board.done_count();
    ((100 * done) as f64 / total as f64).round() as u8
}

/// Whether a recompute moved the project into `completed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Unchanged,
    Completed,
}

/// Recompute `board.progress` and apply the one-way completion transition.
///
/// An active project whose progress reaches 100 becomes completed. Dropping
/// below 100 afterwards leaves the status alone; archived projects are never
/// touched.
pub fn recompute(project: &mut Project) -> Completion {
    project.board.progress = compute_progress(&project.board);
    if project.board.progress == 100 && project.status == ProjectStatus::Active {
        project.status = ProjectStatus::Completed;
        Completion::Completed
    } else {
        Completion::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_models::{Card, CardStatus, Priority};

    fn project_with(statuses: &[CardStatus]) -> Project {
        let mut project = Project::new("t1", "P", "");
        for status in statuses {
            let idx = match status {
                CardStatus::Todo => 0,
                CardStatus::InProgress => 1,
                CardStatus::Done => 2,
            };
            project.board.columns[idx]
                .cards
                .push(Card::new("c", Priority::Low).with_status(*status));
        }
        project
    }

    #[test]
    fn test_empty_board_is_zero() {
        assert_eq!(compute_progress(&Project::new("t1", "P", "").board), 0);
    }

    #[test]
    fn test_rounding() {
        let p = project_with(&[CardStatus::Done, CardStatus::Todo, CardStatus::Todo]);
        assert_eq!(compute_progress(&p.board), 33);

        let p = project_with(&[CardStatus::Done, CardStatus::Done, CardStatus::InProgress]);
        assert_eq!(compute_progress(&p.board), 67);

        let p = project_with(&[CardStatus::Done, CardStatus::Todo]);
        assert_eq!(compute_progress(&p.board), 50);
    }

    #[test]
    fn test_recompute_completes_once() {
        let mut p = project_with(&[CardStatus::Done]);
        assert_eq!(recompute(&mut p), Completion::Completed);
        assert_eq!(p.status, ProjectStatus::Completed);
        assert_eq!(recompute(&mut p), Completion::Unchanged);
    }

    #[test]
    fn test_completion_is_not_reverted() {
        let mut p = project_with(&[CardStatus::Done]);
        recompute(&mut p);
        p.board.columns[0]
            .cards
            .push(Card::new("late", Priority::Low));
        assert_eq!(recompute(&mut p), Completion::Unchanged);
        assert_eq!(p.board.progress, 50);
        assert_eq!(p.status, ProjectStatus::Completed);
    }

    #[test]
    fn test_archived_project_stays_archived() {
        let mut p = project_with(&[CardStatus::Done]);
        p.status = ProjectStatus::Archived;
        assert_eq!(recompute(&mut p), Completion::Unchanged);
        assert_eq!(p.status, ProjectStatus::Archived);
    }
}
