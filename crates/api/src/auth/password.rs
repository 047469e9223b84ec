//! Argon2id credential hashing, verification, and strength validation.
//!
//! All digests use the Argon2id variant with a cryptographically random salt
//! generated via [`OsRng`]. The PHC string format is used for storage so that
//! algorithm parameters and salt are embedded in the digest itself.
//!
//! Hashing can be switched off (`ENABLE_ENCRYPTION=false`) for non-production
//! testing. The digest is then the plaintext itself and verification is a
//! direct comparison. The default is always enabled.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use validator::ValidationError;

/// Minimum password length accepted on registration and password change.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hashing configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HasherConfig {
    /// When `false`, passwords are stored and compared as plaintext.
    pub enabled: bool,
    /// Argon2 memory cost in KiB.
    pub memory_kib: u32,
    /// Argon2 iteration count.
    pub iterations: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid Argon2 parameters: {0}")]
    Params(argon2::Error),

    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("hashing task did not complete: {0}")]
    Task(String),
}

/// Turns plaintext passwords into stored digests and checks them on login.
#[derive(Clone)]
pub struct CredentialHasher {
    enabled: bool,
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl CredentialHasher {
    pub fn new(config: &HasherConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(PasswordError::Params)?;
        Ok(Self {
            enabled: config.enabled,
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Returns the PHC-formatted digest (algorithm, params, salt, and hash).
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if !self.enabled {
            return Ok(password.to_string());
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(PasswordError::Hash)?;
        Ok(hash.to_string())
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
    /// A digest that is not a valid PHC string is an error, not a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        if !self.enabled {
            return Ok(password == digest);
        }
        let parsed = PasswordHash::new(digest).map_err(PasswordError::Hash)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e)),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool.
    pub async fn verify_blocking(
        &self,
        password: String,
        digest: String,
    ) -> Result<bool, PasswordError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| PasswordError::Task(e.to_string()))?
    }
}

/// Validate that a password meets minimum strength requirements.
///
/// Currently enforces a minimum character length. Returns `Ok(())` when the
/// password is acceptable, or `Err` with a human-readable explanation.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

/// `validator` hook applying [`validate_password_strength`] with
/// [`MIN_PASSWORD_LENGTH`] to request DTO password fields.
///
/// ```ignore
/// #[validate(length(max = 255), custom(function = "validate_password"))]
/// pub password: String,
/// ```
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(|reason| {
        let mut err = ValidationError::new("length");
        err.message = Some(reason.into());
        err
    })
}
