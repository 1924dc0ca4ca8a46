use thiserror::Error;

/// Malformed or out-of-bound client input. Detected before any data
/// access is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("limit must be between 1 and 200, got {0}")]
    LimitOutOfRange(i64),

    #[error("offset must be non-negative, got {0}")]
    NegativeOffset(i64),

    #[error("at least one field must be selected")]
    NoFields,

    #[error("unknown column: {0}")]
    UnknownColumn(String),

    #[error("username must be between 6 and 40 characters")]
    UsernameLength,

    #[error("password must be between 6 and 100 characters")]
    PasswordLength,

    #[error("invalid email address")]
    InvalidEmail,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(6..=40).contains(&len) {
        return Err(ValidationError::UsernameLength);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(6..=100).contains(&len) {
        return Err(ValidationError::PasswordLength);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(ValidationError::InvalidEmail);
    }
    // every dot-separated label must be non-empty ("user@.com", "user@a..b")
    if domain.split('.').any(str::is_empty) {
        return Err(ValidationError::InvalidEmail);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_length_bounds() {
        assert!(validate_username("short").is_err());
        assert!(validate_username("sixchr").is_ok());
        assert!(validate_username(&"x".repeat(40)).is_ok());
        assert!(validate_username(&"x".repeat(41)).is_err());
    }

    #[test]
    fn password_length_bounds() {
        assert!(validate_password("five5").is_err());
        assert!(validate_password("sixsix").is_ok());
        assert!(validate_password(&"p".repeat(100)).is_ok());
        assert!(validate_password(&"p".repeat(101)).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("userexample.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@example.").is_err());
        assert!(validate_email("user@.com").is_err());
        assert!(validate_email("user@a..com").is_err());
        assert!(validate_email("us er@example.com").is_err());
    }
}
