use uuid::Uuid;

use crate::application::errors::ServiceError;
use crate::application::forms::account::{ProfileForm, USERNAME_TAKEN};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::user::{ProfileChanges, User};

pub struct UpdateProfile<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> UpdateProfile<'a, R> {
    pub async fn execute(&self, user_id: Uuid, form: &ProfileForm) -> Result<User, ServiceError> {
        let mut errors = form.validate().err().unwrap_or_default();
        let username = form.username.trim();
        if !errors.has("username") && self.repo.username_taken(username, Some(user_id)).await? {
            errors.add("username", USERNAME_TAKEN);
        }
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        let changes = ProfileChanges {
            username: username.to_string(),
            email: form.email.trim().to_string(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            send_messages: form.send_messages,
        };
        self.repo
            .update_profile(user_id, &changes)
            .await
            .map_err(ServiceError::from_user_write)?
            .ok_or(ServiceError::NotFound)
    }
}
