use crate::application::ports::user_repository::UserRepository;
use crate::application::services::signing::ActivationSigner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Activated,
    AlreadyActivated,
    /// The signature did not verify (tampered, expired or not an activation token).
    Failed,
}

pub struct Activate<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub signer: &'a ActivationSigner,
}

impl<'a, R: UserRepository + ?Sized> Activate<'a, R> {
    /// Returns None when the signed username no longer exists.
    pub async fn execute(&self, sign: &str) -> anyhow::Result<Option<ActivationOutcome>> {
        let username = match self.signer.unsign(sign) {
            Ok(u) => u,
            Err(err) => {
                tracing::debug!(error = %err, "activation_signature_rejected");
                return Ok(Some(ActivationOutcome::Failed));
            }
        };
        let Some(user) = self.repo.find_by_username(&username).await? else {
            return Ok(None);
        };
        if user.is_activated {
            return Ok(Some(ActivationOutcome::AlreadyActivated));
        }
        self.repo.mark_activated(user.id).await?;
        tracing::info!(user_id = %user.id, "user_activated");
        Ok(Some(ActivationOutcome::Activated))
    }
}
