//! Customer login credentials.

use core::fmt;

/// Errors that can occur when building [`LoginCredentials`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("email is required")]
    MissingEmail,
    #[error("password is required")]
    MissingPassword,
}

/// Email and password submitted to the storefront login endpoint.
///
/// Only presence is checked; whether the pair is valid is for the commerce
/// backend to decide. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: String,
}

impl LoginCredentials {
    /// Build credentials from optional request fields.
    ///
    /// # Errors
    ///
    /// Returns an error if either field is absent or blank.
    pub fn new(email: Option<String>, password: Option<String>) -> Result<Self, CredentialsError> {
        let email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or(CredentialsError::MissingEmail)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(CredentialsError::MissingPassword)?;
        Ok(Self { email, password })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_both_fields() {
        assert_eq!(
            LoginCredentials::new(None, Some("pw".to_string())),
            Err(CredentialsError::MissingEmail)
        );
        assert_eq!(
            LoginCredentials::new(Some("  ".to_string()), Some("pw".to_string())),
            Err(CredentialsError::MissingEmail)
        );
        assert_eq!(
            LoginCredentials::new(Some("a@b.c".to_string()), Some(String::new())),
            Err(CredentialsError::MissingPassword)
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds =
            LoginCredentials::new(Some("shopper@example.com".to_string()), Some("hunter22".to_string()))
                .expect("valid credentials");
        let debug_output = format!("{creds:?}");
        assert!(debug_output.contains("shopper@example.com"));
        assert!(!debug_output.contains("hunter22"));
    }
}
