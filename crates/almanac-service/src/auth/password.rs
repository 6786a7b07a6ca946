use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Hashes a password using Argon2id with a random salt.
///
/// ## Errors
/// Returns an error if password hashing fails.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InvalidConfiguration(format!("Failed to hash password: {e}")))
}

/// ## Summary
/// Checks `password` against a stored Argon2 hash.
///
/// ## Errors
/// Returns `NotAuthenticated` on a mismatch and `InvalidConfiguration` if the
/// stored hash cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> ServiceResult<()> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| ServiceError::InvalidConfiguration(format!("Invalid password hash: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|err| {
            tracing::trace!("Password verification failed: {}", err);
            ServiceError::NotAuthenticated
        })
}

/// ## Summary
/// Runs argon2-bound work on the blocking thread pool and awaits its result.
///
/// ## Errors
/// Returns the error from `work`, or `InvariantViolation` if the task panicked
/// or was cancelled.
pub async fn run_blocking<T, F>(work: F) -> ServiceResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        tracing::error!(error = %e, "Password task did not complete");
        ServiceError::InvariantViolation("password task did not complete")
    })?
}
