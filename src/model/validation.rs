//! Input validation for forms and ratings

use thiserror::Error;

/// Minimum accepted password length on registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validation failures. All of them are recoverable: the form can simply be
/// submitted again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a topic")]
    EmptyTopic,

    #[error("Please enter a valid time period")]
    InvalidTimePeriod,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords don't match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Hardness rating must be between 1 and 10, got {0}")]
    RatingOutOfRange(i64),
}

/// Registration form input
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Check the form before it is sent to the backend
    pub fn validate(&self) -> Result<(), ValidationError> {
        if [&self.name, &self.email, &self.password, &self.confirm_password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }
}

/// Login form input
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

/// Validate a topic name entered by the user
pub fn validate_topic_name(topic: &str) -> Result<&str, ValidationError> {
    let topic = topic.trim();
    if topic.is_empty() { Err(ValidationError::EmptyTopic) } else { Ok(topic) }
}
