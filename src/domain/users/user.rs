use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_activated: bool,
    pub send_messages: bool,
    pub date_joined: chrono::DateTime<chrono::Utc>,
}

impl User {
    /// Inactive accounts (not yet activated, or disabled) never authenticate.
    pub fn can_authenticate(&self) -> bool {
        self.is_active
    }
}

/// Editable subset of the profile.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub send_messages: bool,
}
