use thiserror::Error;

use crate::application::forms::FormErrors;
use crate::application::forms::account::USERNAME_TAKEN;
use crate::application::ports::user_repository::UsernameTaken;

/// Failure modes shared by the use cases that validate user input.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed")]
    Validation(FormErrors),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<FormErrors> for ServiceError {
    fn from(errors: FormErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl ServiceError {
    /// Reports a username conflict from a user write as a `username` field error.
    pub fn from_user_write(err: anyhow::Error) -> Self {
        if err.is::<UsernameTaken>() {
            let mut errors = FormErrors::new();
            errors.add("username", USERNAME_TAKEN);
            ServiceError::Validation(errors)
        } else {
            ServiceError::Internal(err)
        }
    }
}
