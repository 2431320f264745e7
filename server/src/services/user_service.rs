//! User registration, credential verification, session identity lookup.
//!
//! Passwords are stored as Argon2 PHC strings. Authentication looks up
//! by username only and verifies the hash separately, so a missing user
//! and a wrong password are indistinguishable to the caller.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use thiserror::Error;

use crate::models::user::{NewUser, User};
use crate::schema::users;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already taken")]
    DuplicateUsername,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Create a new account. A unique violation on username maps to
/// `DuplicateUsername`.
pub async fn register(
    conn: &mut AsyncPgConnection,
    username: &str,
    password: &str,
) -> Result<i64, AuthError> {
    let new_user = NewUser {
        username: username.to_string(),
        password_hash: hash_password(password)?,
    };

    let user: User = diesel::insert_into(users::table)
        .values(&new_user)
        .get_result(conn)
        .await
        .map_err(|e| match e {
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ) => AuthError::DuplicateUsername,
            other => AuthError::Database(other),
        })?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(user.id)
}

/// Verify credentials and return the matching account.
pub async fn authenticate(
    conn: &mut AsyncPgConnection,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user: Option<User> = users::table
        .filter(users::username.eq(username))
        .first(conn)
        .await
        .optional()?;

    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => Err(AuthError::InvalidCredentials),
    }
}

/// Rehydrate the current session's identity.
pub async fn load(conn: &mut AsyncPgConnection, id: i64) -> Result<Option<User>, AuthError> {
    let user = users::table.find(id).first::<User>(conn).await.optional()?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifies() {
        let a = hash_password("secret").unwrap();
        let b = hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert_ne!(a, "secret");
        assert!(verify_password("secret", &a));
        assert!(verify_password("secret", &b));
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("secret").unwrap();
        assert!(!verify_password("Secret", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn malformed_stored_hash_fails_closed() {
        assert!(!verify_password("secret", "not-a-phc-string"));
        assert!(!verify_password("secret", ""));
    }
}
