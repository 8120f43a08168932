use async_trait::async_trait;

use crate::application::ports::activation_notifier::ActivationNotifier;
use crate::domain::users::user::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationLetter {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub fn render_activation_letter(user: &User, activation_url: &str) -> ActivationLetter {
    let greeting = if user.first_name.is_empty() {
        user.username.clone()
    } else {
        user.first_name.clone()
    };
    ActivationLetter {
        to: user.email.clone(),
        subject: format!("Activation of user {}", user.username),
        body: format!(
            "Dear {greeting}!\n\n\
             You have registered on the board.\n\
             To activate your account follow the link below:\n\n\
             {activation_url}\n\n\
             Goodbye!\n"
        ),
    }
}

/// Emits the activation letter as a structured log event instead of sending mail.
#[derive(Debug, Default, Clone)]
pub struct LogActivationNotifier;

#[async_trait]
impl ActivationNotifier for LogActivationNotifier {
    async fn send_activation(&self, user: &User, activation_url: &str) -> anyhow::Result<()> {
        let letter = render_activation_letter(user, activation_url);
        tracing::info!(
            user_id = %user.id,
            to = %letter.to,
            subject = %letter.subject,
            activation_url = %activation_url,
            body = %letter.body,
            "activation_letter"
        );
        Ok(())
    }
}
