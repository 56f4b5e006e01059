//! Service plumbing shared by the application services

use std::sync::Arc;

use async_trait::async_trait;
use kb_core::config::{AppConfig, EngineConfig};
use kb_core::{KbResult, ServiceResult};
use kb_store::{HttpStore, RemoteStore};

use crate::engine::BoardEngine;
use crate::workspace::Workspace;

/// Base trait for services that validate their input before writing
#[async_trait]
pub trait Callable<Params, Output> {
    async fn call(&self, params: Params) -> ServiceResult<Output>;
}

/// Everything a service needs: the store, the shared workspace and the
/// board engine operating on both.
pub struct ServiceContext<S: RemoteStore + ?Sized> {
    store: Arc<S>,
    workspace: Arc<Workspace>,
    engine: BoardEngine<S>,
}

impl<S: RemoteStore + ?Sized> ServiceContext<S> {
    pub fn new(store: Arc<S>, config: EngineConfig) -> Self {
        let workspace = Arc::new(Workspace::new());
        let engine = BoardEngine::new(store.clone(), workspace.clone(), config);
        Self {
            store,
            workspace,
            engine,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn workspace(&self) -> &Arc<Workspace> {
        &self.workspace
    }

    pub fn engine(&self) -> &BoardEngine<S> {
        &self.engine
    }
}

impl ServiceContext<HttpStore> {
    /// Context talking to the configured REST backend
    pub fn from_config(config: &AppConfig) -> KbResult<Self> {
        let store = HttpStore::new(&config.store)?;
        Ok(Self::new(Arc::new(store), config.engine.clone()))
    }
}
