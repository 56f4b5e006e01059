//! # kb-store
//!
//! Client for the REST backend that persists teams and users.
//!
//! The backend is an opaque resource API keyed by id. [`RemoteStore`] is the
//! seam: [`HttpStore`] talks to the real backend, [`MemoryStore`] keeps
//! everything in process and can be scripted to fail or stall writes. The
//! gateways build the project, card and user operations on top of the team
//! and user resources.

pub mod error;
pub mod store;
pub mod http;
pub mod memory;
pub mod teams;
pub mod projects;
pub mod cards;
pub mod users;

pub use error::{StoreError, StoreResult};
pub use store::RemoteStore;
pub use http::HttpStore;
pub use memory::{MemoryStore, WritePlan};
pub use teams::TeamGateway;
pub use projects::{ProjectGateway, ProjectPatch};
pub use cards::CardGateway;
pub use users::UserGateway;
