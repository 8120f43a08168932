use crate::application::ports::user_repository::UserRepository;
use crate::application::services::passwords;
use crate::domain::users::user::User;

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    /// None for unknown users, wrong passwords and accounts that are not active.
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<User>> {
        let (user, hash) = match self.repo.find_credentials(req.username.trim()).await? {
            Some(found) => found,
            None => return Ok(None),
        };
        if !passwords::verify_password(&req.password, &hash) {
            return Ok(None);
        }
        if !user.can_authenticate() {
            tracing::debug!(user_id = %user.id, "login_rejected_inactive");
            return Ok(None);
        }
        Ok(Some(user))
    }
}
