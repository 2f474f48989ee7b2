/// Password hashing and registration password rules
///
/// Passwords are hashed with Argon2id and stored as PHC strings, so the
/// parameters travel with each hash and can be raised later without breaking
/// existing accounts.
///
/// # Parameters
///
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash, 16-byte random salt
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Corr3ct-Horse")?;
/// assert!(verify_password("Corr3ct-Horse", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};
use std::sync::OnceLock;

/// Minimum password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// The stored hash isn't a PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with Argon2id
///
/// Returns a PHC string such as
/// `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// `Ok(false)` means the password is wrong. An error means the stored hash is
/// unusable, which callers should treat as a server fault rather than a failed
/// login.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are read from the PHC string
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Spends the same Argon2 work as [`verify_password`] without an account
///
/// Login calls this when no user matches the email, so an unknown address costs
/// as much as a wrong password. Always returns `false`.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
    false
}

/// A hash made with the same parameters as real accounts, computed once
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    DUMMY_HASH
        .get_or_init(|| hash_password("taskboard-no-such-user").ok())
        .as_deref()
}

/// Checks a new password against the registration rules
///
/// At least [`MIN_PASSWORD_LENGTH`] characters, with an uppercase letter, a
/// lowercase letter, a digit and a non-alphanumeric character. Returns the first
/// rule that fails.
///
/// ```
/// use taskboard_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("MyP@ssw0rd!").is_ok());
/// assert!(validate_password_strength("Sh0rt!").is_err());
/// assert!(validate_password_strength("Password123").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if !password.chars().any(char::is_uppercase) {
        return Err("Password must contain at least one uppercase letter".to_string());
    }

    if !password.chars().any(char::is_lowercase) {
        return Err("Password must contain at least one lowercase letter".to_string());
    }

    if !password.chars().any(char::is_numeric) {
        return Err("Password must contain at least one digit".to_string());
    }

    if password.chars().all(char::is_alphanumeric) {
        return Err("Password must contain at least one special character".to_string());
    }

    Ok(())
}
