use async_trait::async_trait;

use crate::domain::users::user::User;

/// Delivers the activation link to a freshly registered user.
#[async_trait]
pub trait ActivationNotifier: Send + Sync {
    async fn send_activation(&self, user: &User, activation_url: &str) -> anyhow::Result<()>;
}
