//! # kb-board
//!
//! Pure state transitions over a project's board.
//!
//! Nothing in this crate performs I/O. Every operation takes a project value
//! and produces the next one, recomputing progress and the completion
//! transition as part of the same step. The optimistic engine in
//! `kb-services` wraps these transitions with snapshot, publish and rollback.

pub mod progress;
pub mod transitions;
pub mod filter;
pub mod audit;

pub use progress::{compute_progress, recompute, Completion};
pub use transitions::{apply, BoardOp, Outcome, Skip, Transition};
pub use filter::{AssigneeFilter, BoardFilter, PriorityFilter};
pub use audit::{audit, Violation};
