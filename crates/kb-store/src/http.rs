//! HTTP implementation of the remote store

use async_trait::async_trait;
use kb_core::config::StoreConfig;
use kb_models::{NewTeam, Team, TeamPatch, UserRecord};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::store::RemoteStore;

/// Store backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: Url,
}

impl HttpStore {
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(config.base_url.clone()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, escaping each one
    pub fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        resource: &'static str,
        id: &str,
    ) -> StoreResult<T> {
        let response = Self::check(response, resource, id).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn check(response: Response, resource: &'static str, id: &str) -> StoreResult<Response> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(resource, id));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    #[instrument(skip(self))]
    async fn list_teams(&self) -> StoreResult<Vec<Team>> {
        let response = self.client.get(self.endpoint(&["teams"])?).send().await?;
        let teams: Vec<Team> = Self::decode(response, "teams", "").await?;
        debug!(count = teams.len(), "Fetched teams");
        Ok(teams)
    }

    #[instrument(skip(self))]
    async fn get_team(&self, id: &str) -> StoreResult<Team> {
        let response = self.client.get(self.endpoint(&["teams", id])?).send().await?;
        Self::decode(response, "teams", id).await
    }

    #[instrument(skip(self, team), fields(name = %team.name))]
    async fn create_team(&self, team: &NewTeam) -> StoreResult<Team> {
        let response = self
            .client
            .post(self.endpoint(&["teams"])?)
            .json(team)
            .send()
            .await?;
        Self::decode(response, "teams", "").await
    }

    #[instrument(skip(self, patch))]
    async fn patch_team(&self, id: &str, patch: &TeamPatch) -> StoreResult<Team> {
        let response = self
            .client
            .patch(self.endpoint(&["teams", id])?)
            .json(patch)
            .send()
            .await?;
        Self::decode(response, "teams", id).await
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, id: &str) -> StoreResult<()> {
        let response = self.client.delete(self.endpoint(&["teams", id])?).send().await?;
        Self::check(response, "teams", id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserRecord>> {
        let response = self.client.get(self.endpoint(&["users", uid])?).send().await?;
        match Self::decode(response, "users", uid).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, user), fields(uid = %user.uid))]
    async fn create_user(&self, user: &UserRecord) -> StoreResult<UserRecord> {
        let response = self
            .client
            .post(self.endpoint(&["users"])?)
            .json(user)
            .send()
            .await?;
        Self::decode(response, "users", &user.uid).await
    }

    #[instrument(skip(self, user))]
    async fn put_user(&self, uid: &str, user: &UserRecord) -> StoreResult<UserRecord> {
        let response = self
            .client
            .put(self.endpoint(&["users", uid])?)
            .json(user)
            .send()
            .await?;
        Self::decode(response, "users", uid).await
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, uid: &str) -> StoreResult<()> {
        let response = self.client.delete(self.endpoint(&["users", uid])?).send().await?;
        Self::check(response, "users", uid).await?;
        Ok(())
    }
}
