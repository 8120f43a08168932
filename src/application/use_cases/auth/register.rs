use crate::application::errors::ServiceError;
use crate::application::forms::account::{RegisterForm, USERNAME_TAKEN};
use crate::application::ports::activation_notifier::ActivationNotifier;
use crate::application::ports::user_repository::{NewUser, UserRepository};
use crate::application::services::passwords;
use crate::application::services::signing::ActivationSigner;
use crate::domain::users::user::User;

pub struct Register<'a, R, N>
where
    R: UserRepository + ?Sized,
    N: ActivationNotifier + ?Sized,
{
    pub repo: &'a R,
    pub notifier: &'a N,
    pub signer: &'a ActivationSigner,
    /// Origin the activation link points at, e.g. `https://board.example.com`.
    pub base_url: &'a str,
}

pub fn activation_url(base_url: &str, sign: &str) -> String {
    format!(
        "{}/api/accounts/activate/{}",
        base_url.trim_end_matches('/'),
        sign
    )
}

impl<'a, R, N> Register<'a, R, N>
where
    R: UserRepository + ?Sized,
    N: ActivationNotifier + ?Sized,
{
    pub async fn execute(&self, form: &RegisterForm) -> Result<User, ServiceError> {
        let mut errors = form.validate().err().unwrap_or_default();
        let username = form.username.trim();
        if !errors.has("username") && self.repo.username_taken(username, None).await? {
            errors.add("username", USERNAME_TAKEN);
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let password_hash = passwords::hash_password(&form.password1)?;
        let user = self
            .repo
            .create_user(&NewUser {
                username: username.to_string(),
                email: form.email.trim().to_string(),
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                send_messages: form.send_messages,
                password_hash,
            })
            .await
            .map_err(ServiceError::from_user_write)?;

        let sign = self.signer.sign(&user.username)?;
        let url = activation_url(self.base_url, &sign);
        if let Err(err) = self.notifier.send_activation(&user, &url).await {
            tracing::error!(user_id = %user.id, error = ?err, "activation_notification_failed");
        }
        tracing::info!(user_id = %user.id, username = %user.username, "user_registered");
        Ok(user)
    }
}
