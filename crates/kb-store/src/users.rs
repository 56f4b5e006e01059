//! User record operations

use chrono::Utc;
use kb_models::{AuthUser, UserRecord};
use tracing::{info, instrument};

use crate::error::StoreResult;
use crate::store::RemoteStore;

pub struct UserGateway<'a, S: RemoteStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RemoteStore + ?Sized> UserGateway<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Mirror an authenticated user, stamping `lastLoginAt`.
    ///
    /// Updates the record when one exists for the uid, creates it otherwise.
    #[instrument(skip(self, user), fields(uid = %user.uid))]
    pub async fn save_user(&self, user: &AuthUser) -> StoreResult<UserRecord> {
        let record = UserRecord::from_auth(user, Utc::now());
        match self.store.get_user(&user.uid).await? {
            Some(_) => self.store.put_user(&user.uid, &record).await,
            None => {
                let created = self.store.create_user(&record).await?;
                info!("user record created");
                Ok(created)
            }
        }
    }

    pub async fn get_user(&self, uid: &str) -> StoreResult<Option<UserRecord>> {
        self.store.get_user(uid).await
    }

    pub async fn update_user(&self, record: &UserRecord) -> StoreResult<UserRecord> {
        self.store.put_user(&record.uid, record).await
    }

    pub async fn delete_user(&self, uid: &str) -> StoreResult<()> {
        self.store.delete_user(uid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    fn ada() -> AuthUser {
        AuthUser {
            uid: "u1".into(),
            email: Some("ada@example.com".into()),
            display_name: Some("Ada".into()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn test_save_user_creates_then_updates() {
        let store = MemoryStore::new();
        let gateway = UserGateway::new(&store);

        let first = gateway.save_user(&ada()).await.unwrap();
        assert_eq!(first.id, "u1");

        let mut renamed = ada();
        renamed.display_name = Some("Ada L.".into());
        let second = gateway.save_user(&renamed).await.unwrap();
        assert_eq!(second.display_name.as_deref(), Some("Ada L."));
        assert!(second.last_login_at >= first.last_login_at);

        let stored = gateway.get_user("u1").await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemoryStore::new();
        let gateway = UserGateway::new(&store);
        let mut record = gateway.save_user(&ada()).await.unwrap();

        record.email = None;
        gateway.update_user(&record).await.unwrap();
        assert_eq!(gateway.get_user("u1").await.unwrap().unwrap().email, None);

        gateway.delete_user("u1").await.unwrap();
        assert_eq!(gateway.get_user("u1").await.unwrap(), None);
    }
}
