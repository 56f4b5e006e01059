//! User records mirrored from the identity provider

use chrono::{DateTime, Utc};
use kb_core::traits::{Entity, Id, Identifiable};
use serde::{Deserialize, Serialize};

/// Authenticated user as delivered by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: Id,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// User record stored under `users/{uid}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: Id,
    pub uid: Id,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Record for a freshly signed-in user; the record id is the uid
    pub fn from_auth(user: &AuthUser, last_login_at: DateTime<Utc>) -> Self {
        Self {
            id: user.uid.clone(),
            uid: user.uid.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            last_login_at: Some(last_login_at),
        }
    }
}

impl Identifiable for UserRecord {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for UserRecord {
    const RESOURCE_NAME: &'static str = "users";
    const TYPE_NAME: &'static str = "User";
}
