use uuid::Uuid;

use crate::application::errors::ServiceError;
use crate::application::forms::account::PasswordChangeForm;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords;

pub struct ChangePassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ChangePassword<'a, R> {
    pub async fn execute(&self, user_id: Uuid, form: &PasswordChangeForm) -> Result<(), ServiceError> {
        let user = self
            .repo
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound)?;
        let stored = self
            .repo
            .password_hash(user_id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        let mut errors = form.validate(&user.username).err().unwrap_or_default();
        if !errors.has("old_password") && !passwords::verify_password(&form.old_password, &stored)
        {
            errors.add(
                "old_password",
                "Your old password was entered incorrectly. Please enter it again.",
            );
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }

        let hash = passwords::hash_password(&form.new_password1)?;
        if !self.repo.set_password_hash(user_id, &hash).await? {
            return Err(ServiceError::NotFound);
        }
        tracing::info!(user_id = %user_id, "password_changed");
        Ok(())
    }
}
