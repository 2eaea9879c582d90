//! Form validation performed before anything is sent.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::password::{MIN_LENGTH, SPECIAL_CHARS};
use crate::core::api::{ProfileUpdate, Registration};
use crate::core::error::ValidationError;

static SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(SPECIAL_CHARS).unwrap());

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Length, mixed case, digit and special character.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort(MIN_LENGTH));
    }
    let upper = password.chars().any(char::is_uppercase);
    let lower = password.chars().any(char::is_lowercase);
    if !(upper && lower) {
        return Err(ValidationError::PasswordMissingCase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordMissingDigit);
    }
    if !SPECIAL.is_match(password) {
        return Err(ValidationError::PasswordMissingSpecial);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required("Email"));
    }
    if !EMAIL.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(())
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    required(email, "Email")?;
    required(password, "Password")
}

pub fn validate_registration(form: &Registration) -> Result<(), ValidationError> {
    required(&form.first_name, "First name")?;
    required(&form.last_name, "Last name")?;
    validate_email(&form.email)?;
    validate_password(&form.password)?;
    if form.password != form.password_confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// The current password is always required; a new password is optional but
/// must match its confirmation.
pub fn validate_profile_update(form: &ProfileUpdate) -> Result<(), ValidationError> {
    if form.old_password.is_empty() {
        return Err(ValidationError::CurrentPasswordRequired);
    }
    validate_email(&form.email)?;
    if !form.new_password.is_empty() || !form.confirm_password.is_empty() {
        if form.new_password != form.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        validate_password(&form.new_password)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_policy() {
        assert_eq!(validate_password("Ab1!"), Err(ValidationError::PasswordTooShort(8)));
        assert_eq!(validate_password("abcdefg1!"), Err(ValidationError::PasswordMissingCase));
        assert_eq!(validate_password("Abcdefgh!"), Err(ValidationError::PasswordMissingDigit));
        assert_eq!(validate_password("Abcdefg12"), Err(ValidationError::PasswordMissingSpecial));
        assert_eq!(validate_password("Abcdefg1!"), Ok(()));
        assert_eq!(validate_password("Abcdefg1?"), Ok(()));
    }

    #[test]
    fn test_email() {
        assert_eq!(validate_email("a@b.co"), Ok(()));
        assert_eq!(validate_email("  "), Err(ValidationError::Required("Email")));
        assert_eq!(validate_email("not-an-email"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_registration_mismatch() {
        let form = Registration {
            first_name: "Ada".into(),
            last_name: "L".into(),
            email: "ada@example.com".into(),
            password: "Abcdefg1!".into(),
            password_confirmation: "Abcdefg1?".into(),
        };
        assert_eq!(validate_registration(&form), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn test_profile_update_rules() {
        let mut form = ProfileUpdate {
            first_name: "Ada".into(),
            last_name: "L".into(),
            email: "ada@example.com".into(),
            ..Default::default()
        };
        assert_eq!(
            validate_profile_update(&form),
            Err(ValidationError::CurrentPasswordRequired)
        );
        form.old_password = "whatever".into();
        assert_eq!(validate_profile_update(&form), Ok(()));
        form.new_password = "Abcdefg1!".into();
        assert_eq!(validate_profile_update(&form), Err(ValidationError::PasswordMismatch));
        form.confirm_password = "Abcdefg1!".into();
        assert_eq!(validate_profile_update(&form), Ok(()));
    }
}
