//! Account lifecycle logic shared by the registration and login handlers.
//!
//! Centralizes username/password validation, Argon2 hashing, and the
//! registration role policy so the handlers stay thin.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::{store::StoreError, store::UserStore, Role, User};

/// Registration failures that are surfaced to the visitor as a flash
/// notice. `Store(Database)` is the exception and becomes a 500.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("{0}")]
    InvalidUsername(String),
    #[error("{0}")]
    InvalidPassword(String),
    #[error("Unknown role.")]
    UnknownRole,
    #[error("You cannot self-assign that role.")]
    RoleNotPermitted,
    #[error("Username already exists.")]
    UsernameTaken,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("password hash could not be processed")]
    BadHash,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn validate_username(username: &str) -> Result<(), String> {
    let username = username.trim();

    if username.is_empty() {
        return Err("Username cannot be empty.".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters.".to_string());
    }

    if username.len() > 32 {
        return Err("Username cannot exceed 32 characters.".to_string());
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(
            "Username can only contain letters, numbers, underscores, and hyphens.".to_string(),
        );
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 3 {
        return Err("Password must be at least 3 characters.".to_string());
    }

    if password.len() > 128 {
        return Err("Password cannot exceed 128 characters.".to_string());
    }

    Ok(())
}

/// Hash a password using Argon2.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::BadHash)?
        .to_string();

    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|_| AuthError::BadHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Register a new account.
///
/// Role policy: self-registration only grants `user`. The one exception
/// is an empty user table, where the first account may claim `admin` so
/// the instance can be bootstrapped without out-of-band access.
pub async fn register(
    store: &UserStore,
    username: &str,
    password: &str,
    requested_role: &str,
) -> Result<User, RegisterError> {
    validate_username(username).map_err(RegisterError::InvalidUsername)?;
    validate_password(password).map_err(RegisterError::InvalidPassword)?;

    let role = Role::parse(requested_role).ok_or(RegisterError::UnknownRole)?;

    if role != Role::User {
        let first_account = store.count().await? == 0;
        if !(role == Role::Admin && first_account) {
            return Err(RegisterError::RoleNotPermitted);
        }
    }

    let username = username.trim().to_lowercase();

    if store.get_by_username(&username).await?.is_some() {
        return Err(RegisterError::UsernameTaken);
    }

    let password_hash =
        hash_password(password).map_err(|_| RegisterError::Store(StoreError::Corrupt(
            "failed to hash password".to_string(),
        )))?;

    let user = User {
        id: Uuid::new_v4(),
        username,
        role,
        created_at: Utc::now(),
    };

    match store.create(&user, &password_hash).await {
        Ok(()) => {}
        // Lost a race with a concurrent registration; same outcome as
        // the pre-check.
        Err(StoreError::DuplicateUsername) => return Err(RegisterError::UsernameTaken),
        Err(e) => return Err(RegisterError::Store(e)),
    }

    info!(username = %user.username, role = %user.role, "user registered");

    Ok(user)
}

/// Verify credentials and return the matching user.
///
/// Absent usernames and wrong passwords produce the same error so the
/// login form cannot be used to probe for accounts.
pub async fn authenticate(
    store: &UserStore,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let username = username.trim().to_lowercase();

    let user = store
        .get_by_username(&username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let password_hash = store
        .password_hash(user.id)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(password, &password_hash)?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_validation() {
        assert!(validate_username("john_doe").is_ok());
        assert!(validate_username("user123").is_ok());
        assert!(validate_username("test-user").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err()); // Too short
        assert!(validate_username("a".repeat(33).as_str()).is_err()); // Too long
        assert!(validate_username("user@name").is_err()); // Invalid character
    }

    #[test]
    fn password_validation() {
        assert!(validate_password("pw1").is_ok());
        assert!(validate_password("correct horse battery staple").is_ok());

        assert!(validate_password("ab").is_err()); // Too short
        assert!(validate_password(&"x".repeat(129)).is_err()); // Too long
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("pw1234").expect("hash");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("pw1234", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
