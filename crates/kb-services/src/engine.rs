//! Optimistic board engine
//!
//! Every card operation runs in two phases. [`BoardEngine::begin`] is
//! synchronous: it snapshots the project, applies the transition, and
//! publishes the result to the workspace right away. [`BoardEngine::commit`]
//! issues the remote write; if that fails the snapshot is published again
//! and the error is handed back. Nothing is retried.
//!
//! Two operations on the same project that overlap at the remote write can
//! interleave badly: the rollback of the earlier one restores a snapshot
//! that predates the later one. [`BoardEngine::execute`] therefore holds a
//! per-project lock across both phases unless `serialize_writes` is off.

use std::sync::Arc;

use dashmap::DashMap;
use kb_board::{apply, audit, BoardOp, Outcome};
use kb_contracts::{CardContract, Contract};
use kb_core::config::EngineConfig;
use kb_core::{KbError, KbResult};
use kb_models::{Card, Id, Project, Team};
use kb_store::{CardGateway, RemoteStore, TeamGateway};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::workspace::{PublishCause, SyncStatus, Workspace};

/// An applied operation waiting for its remote write
#[derive(Debug)]
pub struct Pending {
    op: BoardOp,
    team_id: Id,
    snapshot: Project,
    applied: Project,
    outcome: Outcome,
    sync: SyncStatus,
}

impl Pending {
    pub fn op(&self) -> &BoardOp {
        &self.op
    }

    /// Project as it was before the operation
    pub fn snapshot(&self) -> &Project {
        &self.snapshot
    }

    /// Project as published by the operation
    pub fn applied(&self) -> &Project {
        &self.applied
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Skipped operations publish nothing and need no remote write
    pub fn is_noop(&self) -> bool {
        !self.outcome.is_changed()
    }
}

/// A confirmed (or skipped) operation
#[derive(Debug, Clone, PartialEq)]
pub struct Ack {
    pub project: Project,
    pub outcome: Outcome,
    pub sync: SyncStatus,
}

pub struct BoardEngine<S: RemoteStore + ?Sized> {
    store: Arc<S>,
    workspace: Arc<Workspace>,
    config: EngineConfig,
    locks: DashMap<Id, Arc<Mutex<()>>>,
}

impl<S: RemoteStore + ?Sized> BoardEngine<S> {
    pub fn new(store: Arc<S>, workspace: Arc<Workspace>, config: EngineConfig) -> Self {
        Self {
            store,
            workspace,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    /// Move a card on the selected project's board
    pub async fn move_card(
        &self,
        card_id: &str,
        source_column_id: &str,
        target_column_id: &str,
    ) -> KbResult<Ack> {
        let project_id = self.selected()?;
        self.execute(&project_id, BoardOp::move_card(card_id, source_column_id, target_column_id))
            .await
    }

    /// Add a card to a column of the selected project
    pub async fn add_card(&self, column_id: &str, card: Card) -> KbResult<Ack> {
        let project_id = self.selected()?;
        self.execute(&project_id, BoardOp::add_card(column_id, card)).await
    }

    pub async fn delete_card(&self, card_id: &str, column_id: &str) -> KbResult<Ack> {
        let project_id = self.selected()?;
        self.execute(&project_id, BoardOp::delete_card(card_id, column_id)).await
    }

    /// Replace a card in place; its status is taken as given
    pub async fn update_card(&self, column_id: &str, card: Card) -> KbResult<Ack> {
        let project_id = self.selected()?;
        self.execute(&project_id, BoardOp::update_card(column_id, card)).await
    }

    /// Run both phases for one operation on `project_id`
    pub async fn execute(&self, project_id: &str, op: BoardOp) -> KbResult<Ack> {
        let _guard = if self.config.serialize_writes {
            let lock = self.locks.entry(project_id.to_string()).or_default().clone();
            Some(lock.lock_owned().await)
        } else {
            None
        };

        let pending = self.begin(project_id, op)?;
        self.commit(pending).await
    }

    /// Validate, snapshot, apply and publish. No suspension point.
    pub fn begin(&self, project_id: &str, op: BoardOp) -> KbResult<Pending> {
        let project = self
            .workspace
            .project(project_id)
            .ok_or_else(|| KbError::not_found("project", "id", project_id))?;
        let op = self.validate(&project, op)?;
        let transition = apply(&project, &op);

        if let Outcome::Unchanged(skip) = &transition.outcome {
            debug!(op = op.name(), project_id, %skip, "operation left the board unchanged");
            return Ok(Pending {
                team_id: project.team_id.clone(),
                snapshot: project.clone(),
                applied: project,
                outcome: transition.outcome,
                sync: SyncStatus::InSync,
                op,
            });
        }

        let sync = self
            .workspace
            .publish(transition.project.clone(), PublishCause::Optimistic);
        self.check_invariants(&transition.project);
        if transition.outcome.completed() {
            info!(project_id, "all cards done, project completed");
        }

        Ok(Pending {
            team_id: project.team_id.clone(),
            snapshot: project,
            applied: transition.project,
            outcome: transition.outcome,
            sync,
            op,
        })
    }

    /// Persist a pending operation, rolling back on failure
    pub async fn commit(&self, pending: Pending) -> KbResult<Ack> {
        if pending.is_noop() {
            return Ok(Ack {
                project: pending.applied,
                outcome: pending.outcome,
                sync: pending.sync,
            });
        }

        match self.write_remote(&pending).await {
            Ok(()) => {
                info!(
                    op = pending.op.name(),
                    project_id = %pending.applied.id,
                    progress = pending.applied.board.progress,
                    "remote write confirmed"
                );
                Ok(Ack {
                    project: pending.applied,
                    outcome: pending.outcome,
                    sync: pending.sync,
                })
            }
            Err(err) => {
                warn!(
                    op = pending.op.name(),
                    project_id = %pending.snapshot.id,
                    error = %err,
                    "remote write failed, rolling back"
                );
                let project_id = pending.snapshot.id.clone();
                if let SyncStatus::Inconsistent(sync_err) = self.restore(pending.snapshot) {
                    warn!(%project_id, error = %sync_err, "rolled back project is out of sync");
                }
                Err(KbError::remote_write(pending.op.name(), err.to_string()))
            }
        }
    }

    /// Publish a snapshot again
    pub fn restore(&self, snapshot: Project) -> SyncStatus {
        self.workspace.publish(snapshot, PublishCause::Rollback)
    }

    async fn write_remote(&self, pending: &Pending) -> KbResult<()> {
        let store = self.store.as_ref();
        let team_id = pending.team_id.as_str();
        let project_id = pending.applied.id.as_str();

        let remote = match &pending.op {
            BoardOp::MoveCard {
                card_id,
                source_column_id,
                target_column_id,
            } => {
                CardGateway::new(store)
                    .move_card(team_id, project_id, card_id, source_column_id, target_column_id)
                    .await?
            }
            BoardOp::AddCard { column_id, card } => {
                CardGateway::new(store)
                    .add_card(team_id, project_id, column_id.clone(), card.clone())
                    .await?
            }
            BoardOp::DeleteCard { .. } | BoardOp::UpdateCard { .. } => {
                let team = self.owning_team(&pending.applied)?;
                TeamGateway::new(store)
                    .patch_projects(team_id, team.projects)
                    .await?;
                return Ok(());
            }
        };

        if let Outcome::Unchanged(skip) = remote {
            debug!(%skip, "stored board already reflected the operation");
        }
        Ok(())
    }

    /// Normalize and check incoming cards. The due date belongs to the card
    /// form; the engine accepts undated cards.
    fn validate(&self, project: &Project, op: BoardOp) -> KbResult<BoardOp> {
        match op {
            BoardOp::AddCard { column_id, card } => {
                let card = card.normalized();
                let team = self.owning_team(project)?;
                CardContract::new(&team)
                    .allow_missing_due_date()
                    .validate(&card)?;
                Ok(BoardOp::AddCard { column_id, card })
            }
            BoardOp::UpdateCard { column_id, card } => {
                let card = card.normalized();
                let team = self.owning_team(project)?;
                CardContract::new(&team)
                    .allow_missing_due_date()
                    .validate(&card)?;
                Ok(BoardOp::UpdateCard { column_id, card })
            }
            // persisted through the team's project list
            BoardOp::DeleteCard { .. } => {
                self.owning_team(project)?;
                Ok(op)
            }
            other => Ok(other),
        }
    }

    fn owning_team(&self, project: &Project) -> KbResult<Team> {
        self.workspace
            .team(&project.team_id)
            .ok_or_else(|| KbError::SyncInconsistency {
                team_id: project.team_id.clone(),
                project_id: project.id.clone(),
            })
    }

    fn selected(&self) -> KbResult<Id> {
        self.workspace
            .selected_id()
            .ok_or_else(|| KbError::not_found("project", "selection", "none"))
    }

    fn check_invariants(&self, project: &Project) {
        if cfg!(debug_assertions) {
            let violations = audit(project);
            if !violations.is_empty() {
                warn!(project_id = %project.id, ?violations, "board invariants violated");
            }
        }
    }
}
