//! Account identity and credential forms.

use crate::model::form::{limit_chars, require, FormErrors, NON_FIELD_ERRORS};
use serde::{Deserialize, Serialize};

/// Primary key of a `users` row.
pub type UserId = i64;

/// Maximum username length in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Authenticated identity. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Signup submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

impl SignupForm {
    /// Checks field shape only; username availability is a storage concern.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if require(&mut errors, "username", &self.username) {
            limit_chars(&mut errors, "username", self.username.trim(), USERNAME_MAX_CHARS);
        }
        if require(&mut errors, "password1", &self.password1)
            && self.password1.chars().count() < PASSWORD_MIN_CHARS
        {
            errors.add(
                "password1",
                format!("This password is too short. It must contain at least {PASSWORD_MIN_CHARS} characters."),
            );
        }
        if require(&mut errors, "password2", &self.password2) && self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }
        errors.into_result()
    }
}

/// Login submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, "username", &self.username);
        require(&mut errors, "password", &self.password);
        errors.into_result()
    }
}

/// Message shown when username/password do not match an account.
pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

pub(crate) fn invalid_login() -> FormErrors {
    FormErrors::single(NON_FIELD_ERRORS, INVALID_LOGIN_MESSAGE)
}
