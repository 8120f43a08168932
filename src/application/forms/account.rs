use once_cell::sync::Lazy;
use regex::Regex;

use super::{FormErrors, max_chars, require};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@.+_-]+$").expect("valid regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex")
});

pub const USERNAME_MAX: usize = 150;
pub const EMAIL_MAX: usize = 254;
pub const PASSWORD_MIN: usize = 8;

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

pub fn validate_username(errors: &mut FormErrors, field: &str, value: &str) {
    let v = require(errors, field, value);
    if v.is_empty() {
        return;
    }
    max_chars(errors, field, v, USERNAME_MAX);
    if !USERNAME_RE.is_match(v) {
        errors.add(
            field,
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

pub fn validate_email(errors: &mut FormErrors, field: &str, value: &str) {
    let v = require(errors, field, value);
    if v.is_empty() {
        return;
    }
    max_chars(errors, field, v, EMAIL_MAX);
    if !EMAIL_RE.is_match(v) {
        errors.add(field, "Enter a valid email address.");
    }
}

/// Password rules: minimum length, not all digits, not the username.
pub fn validate_password(errors: &mut FormErrors, field: &str, password: &str, username: &str) {
    if password.is_empty() {
        errors.add(field, super::REQUIRED);
        return;
    }
    if password.chars().count() < PASSWORD_MIN {
        errors.add(
            field,
            format!(
                "This password is too short. It must contain at least {} characters.",
                PASSWORD_MIN
            ),
        );
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(field, "This password is entirely numeric.");
    }
    if !username.is_empty() && password.eq_ignore_ascii_case(username.trim()) {
        errors.add(field, "The password is too similar to the username.");
    }
}

fn passwords_match(errors: &mut FormErrors, field: &str, first: &str, second: &str) {
    if first != second {
        errors.add(field, "The two password fields didn't match.");
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
    pub first_name: String,
    pub last_name: String,
    pub send_messages: bool,
}

impl RegisterForm {
    /// Field-level checks. Username uniqueness needs the repository and is
    /// checked by the register use case.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validate_username(&mut errors, "username", &self.username);
        validate_email(&mut errors, "email", &self.email);
        max_chars(&mut errors, "first_name", self.first_name.trim(), 150);
        max_chars(&mut errors, "last_name", self.last_name.trim(), 150);
        validate_password(&mut errors, "password1", &self.password1, &self.username);
        if self.password2.is_empty() {
            errors.add("password2", super::REQUIRED);
        } else {
            passwords_match(&mut errors, "password2", &self.password1, &self.password2);
        }
        errors.finish(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub send_messages: bool,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        validate_username(&mut errors, "username", &self.username);
        validate_email(&mut errors, "email", &self.email);
        max_chars(&mut errors, "first_name", self.first_name.trim(), 150);
        max_chars(&mut errors, "last_name", self.last_name.trim(), 150);
        errors.finish(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChangeForm {
    pub old_password: String,
    pub new_password1: String,
    pub new_password2: String,
}

impl PasswordChangeForm {
    /// Checks everything except the old password, which needs the stored hash.
    pub fn validate(&self, username: &str) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.old_password.is_empty() {
            errors.add("old_password", super::REQUIRED);
        }
        validate_password(&mut errors, "new_password1", &self.new_password1, username);
        if self.new_password2.is_empty() {
            errors.add("new_password2", super::REQUIRED);
        } else {
            passwords_match(
                &mut errors,
                "new_password2",
                &self.new_password1,
                &self.new_password2,
            );
        }
        errors.finish(())
    }
}
