//! Authentication service: registration, login, and password hashing.
//!
//! Passwords are hashed with Argon2id using per-password salts. Login
//! failures are collapsed into a single `InvalidCredentials` error so the
//! API does not reveal whether an email is registered.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use shopreel_core::{Email, EmailError, UserRole};

use crate::db::{RepositoryError, users::UserRepository};
use crate::models::user::CurrentUser;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong email or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration attempted with an email that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password failed the strength check.
    #[error("{0}")]
    WeakPassword(String),

    /// Email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing or verification failed unexpectedly.
    #[error("password hash error: {0}")]
    PasswordHash(String),
}

/// Service for registration and login.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user and return the session identity.
    ///
    /// An empty display name falls back to the email's local part.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for malformed emails,
    /// `AuthError::WeakPassword` for short passwords, and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let name = name.trim();
        let name = if name.is_empty() {
            email.local_part()
        } else {
            name
        };

        let password_hash = hash_password(password)?;
        let (account, profile) = self
            .users
            .create_with_password(&email, &password_hash, name, role)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(CurrentUser::from_parts(&account, &profile))
    }

    /// Verify credentials and return the session identity.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown emails, malformed
    /// emails, and wrong passwords alike.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some((account, password_hash)) = self.users.get_password_hash(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let profile = self.users.get_or_create_profile(&account).await?;
        Ok(CurrentUser::from_parts(&account, &profile))
    }
}

/// Check a candidate password against the strength policy.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` with a client-facing message.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters",
        )));
    }
    Ok(())
}

/// Hash a password with Argon2id and a fresh salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored PHC-format hash.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if the stored hash is malformed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).unwrap());
        assert!(!verify_password("wrong password!", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-hash"),
            Err(AuthError::PasswordHash(_))
        ));
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("12345678").is_ok());
        assert!(matches!(
            validate_password("1234567"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            validate_password(""),
            Err(AuthError::WeakPassword(_))
        ));
    }
}
