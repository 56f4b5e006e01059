//! Card-level operations
//!
//! Moves and additions are replayed against the team as currently stored:
//! read the team, apply the same board transition to its copy of the
//! project, PATCH the project list back. A transition that does not change
//! the stored board (the card already moved, the column is gone) is not
//! written at all.

use kb_board::{apply, BoardOp, Outcome};
use kb_models::{Card, Id};
use tracing::{debug, instrument};

use crate::error::{StoreError, StoreResult};
use crate::store::RemoteStore;
use crate::teams::TeamGateway;

pub struct CardGateway<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> CardGateway<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub async fn move_card(
        &self,
        team_id: &str,
        project_id: &str,
        card_id: &str,
        source_column_id: &str,
        target_column_id: &str,
    ) -> StoreResult<Outcome> {
        let op = BoardOp::move_card(card_id, source_column_id, target_column_id);
        self.replay(team_id, project_id, &op).await
    }

    pub async fn add_card(
        &self,
        team_id: &str,
        project_id: &str,
        column_id: impl Into<Id>,
        card: Card,
    ) -> StoreResult<Outcome> {
        let op = BoardOp::add_card(column_id, card);
        self.replay(team_id, project_id, &op).await
    }

    #[instrument(skip(self, op), fields(op = op.name(), card_id = op.card_id()))]
    async fn replay(&self, team_id: &str, project_id: &str, op: &BoardOp) -> StoreResult<Outcome> {
        let team = self.store.get_team(team_id).await?;
        let project = team
            .project(project_id)
            .ok_or_else(|| StoreError::not_found("projects", project_id))?;

        let transition = apply(project, op);
        if let Outcome::Unchanged(skip) = &transition.outcome {
            debug!(%skip, "stored board already up to date, nothing to write");
            return Ok(transition.outcome);
        }

        let projects = team.projects_with(&transition.project);
        TeamGateway::new(self.store)
            .patch_projects(team_id, projects)
            .await?;
        Ok(transition.outcome)
    }
}
