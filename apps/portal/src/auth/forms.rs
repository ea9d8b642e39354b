use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::forms::{check, not_blank, FieldErrors};
use crate::models::user::UserType;

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(
        length(min = 1, max = 150, message = "Enter a username of at most 150 characters."),
        custom(function = "valid_username")
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(length(
        min = 8,
        message = "This password is too short. It must contain at least 8 characters."
    ))]
    pub password: String,
    #[validate(must_match(other = "password", message = "The two password fields didn't match."))]
    pub password_confirm: String,
    #[validate(
        length(max = 100, message = "Ensure this value has at most 100 characters."),
        custom(function = "not_blank")
    )]
    pub display_name: String,
    pub user_type: String,
}

/// A registration that passed validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub user_type: UserType,
}

impl RegisterForm {
    pub fn clean(self) -> Result<Registration, FieldErrors> {
        let form = RegisterForm {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            display_name: self.display_name.trim().to_string(),
            ..self
        };

        let mut errors = check(&form);
        let user_type = match form.user_type.parse::<UserType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.add(
                    "user_type",
                    format!(
                        "Select a valid choice. '{}' is not one of the available choices.",
                        form.user_type
                    ),
                );
                None
            }
        };

        match user_type {
            Some(user_type) if errors.is_empty() => Ok(Registration {
                username: form.username,
                email: form.email,
                password: form.password,
                display_name: form.display_name,
                user_type,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn valid_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(ValidationError::new("username").with_message(Cow::Borrowed(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )))
    }
}
