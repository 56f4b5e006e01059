//! Signed-in user session
//!
//! Follows the identity provider's event stream and mirrors each signed-in
//! user into the store's `users` resource.

use std::sync::Arc;

use futures::{pin_mut, Stream, StreamExt};
use kb_core::{KbError, KbResult};
use kb_models::{AuthUser, UserRecord};
use kb_store::{RemoteStore, UserGateway};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Change reported by the identity provider
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityEvent {
    SignedIn(AuthUser),
    /// A previous session was picked up on startup
    Restored(AuthUser),
    SignedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<UserRecord>,
    pub loading: bool,
    pub error: Option<String>,
    /// True until the first identity event has been handled
    pub initializing: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user: None,
            loading: false,
            error: None,
            initializing: true,
        }
    }
}

pub struct SessionService<S: RemoteStore + ?Sized> {
    store: Arc<S>,
    state: watch::Sender<SessionState>,
}

impl<S: RemoteStore + ?Sized> SessionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { store, state }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Handle events until the provider's stream ends
    pub async fn run(&self, events: impl Stream<Item = IdentityEvent>) {
        pin_mut!(events);
        while let Some(event) = events.next().await {
            // failures are kept in the state
            let _ = self.handle(event).await;
        }
    }

    pub async fn handle(&self, event: IdentityEvent) -> KbResult<Option<UserRecord>> {
        match event {
            IdentityEvent::SignedIn(user) | IdentityEvent::Restored(user) => {
                self.state.send_modify(|s| {
                    s.loading = true;
                    s.error = None;
                });
                let result = self.resolve(&user).await;
                self.state.send_modify(|s| {
                    s.loading = false;
                    s.initializing = false;
                    match &result {
                        Ok(record) => s.user = Some(record.clone()),
                        Err(err) => {
                            s.user = None;
                            s.error = Some(err.to_string());
                        }
                    }
                });
                result.map(Some)
            }
            IdentityEvent::SignedOut => {
                debug!("signed out");
                self.state.send_modify(|s| {
                    s.user = None;
                    s.loading = false;
                    s.error = None;
                    s.initializing = false;
                });
                Ok(None)
            }
        }
    }

    /// Create or refresh the stored record for `user`
    pub async fn save_user(&self, user: &AuthUser) -> KbResult<UserRecord> {
        Ok(UserGateway::new(self.store.as_ref()).save_user(user).await?)
    }

    /// Stored record for `user`, created on first sign-in
    async fn resolve(&self, user: &AuthUser) -> KbResult<UserRecord> {
        let existing = UserGateway::new(self.store.as_ref())
            .get_user(&user.uid)
            .await
            .map_err(|err| {
                warn!(uid = %user.uid, error = %err, "could not read user record");
                KbError::from(err)
            })?;

        match existing {
            Some(record) => {
                debug!(uid = %user.uid, "user record found");
                Ok(record)
            }
            None => {
                let record = self.save_user(user).await?;
                info!(uid = %user.uid, "first sign-in, user record saved");
                Ok(record)
            }
        }
    }
}
