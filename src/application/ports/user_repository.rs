use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::users::user::{ProfileChanges, User};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub send_messages: bool,
    pub password_hash: String,
}

/// Raised by writes that would give two accounts the same username.
#[derive(Debug, Error)]
#[error("username already taken")]
pub struct UsernameTaken;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// New accounts are stored inactive and not activated. Fails with
    /// [`UsernameTaken`] on a username conflict, as does `update_profile`.
    async fn create_user(&self, new_user: &NewUser) -> anyhow::Result<User>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// User together with the stored password hash.
    async fn find_credentials(&self, username: &str) -> anyhow::Result<Option<(User, String)>>;
    async fn password_hash(&self, id: Uuid) -> anyhow::Result<Option<String>>;
    /// True when another account (other than `except`) owns `username`.
    async fn username_taken(&self, username: &str, except: Option<Uuid>) -> anyhow::Result<bool>;
    async fn mark_activated(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> anyhow::Result<Option<User>>;
    async fn set_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool>;
    async fn delete_user(&self, id: Uuid) -> anyhow::Result<bool>;
}
