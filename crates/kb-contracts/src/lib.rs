//! # kb-contracts
//!
//! Contract validation for Kanban RS.
//!
//! Contracts validate records before they reach the mutation engine or the
//! remote store. A failed contract means nothing was applied, so there is
//! nothing to roll back.

pub mod base;
pub mod cards;
pub mod projects;
pub mod teams;

pub use base::*;
pub use cards::CardContract;
pub use projects::ProjectContract;
pub use teams::TeamContract;
