use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::error::HashError;

/// CredentialHasher
///
/// One-way transform from a clear-text secret to the value stored in
/// `LocalAccount::password_hash`.
///
/// Implementations must be stable across process restarts. Callers never compare
/// hashes themselves; they go through `verify`, so salted schemes can plug in
/// without changing the authenticator.
pub trait CredentialHasher: Send + Sync {
    /// Short identifier of the scheme, used in logs and configuration.
    fn scheme(&self) -> &'static str;

    /// Produces the stored form of `clear`. The caller is responsible for any
    /// trimming policy; the hasher hashes exactly what it is given.
    fn hash(&self, clear: &str) -> Result<String, HashError>;

    /// Checks `clear` against a previously stored hash.
    ///
    /// The default re-hashes and compares exactly (case-sensitive), which is only
    /// correct for deterministic schemes.
    fn verify(&self, clear: &str, stored: &str) -> bool {
        match self.hash(clear) {
            Ok(candidate) => candidate == stored,
            Err(e) => {
                tracing::warn!("hash computation failed during verify: {}", e);
                false
            }
        }
    }
}

/// HasherState
///
/// Shared handle used by the account service.
pub type HasherState = Arc<dyn CredentialHasher>;

/// LegacySha256Hasher
///
/// Compatibility scheme: Base64(SHA-256(utf8(clear))), no salt.
///
/// Identical passwords produce identical hashes across accounts, which makes stored
/// values open to precomputation attacks. It is kept so that credentials created by
/// earlier deployments keep validating; new deployments should select `Argon2Hasher`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacySha256Hasher;

impl LegacySha256Hasher {
    /// Infallible form of `hash`, the scheme has no failure modes.
    pub fn digest(clear: &str) -> String {
        let digest = Sha256::digest(clear.as_bytes());
        STANDARD.encode(digest)
    }
}

impl CredentialHasher for LegacySha256Hasher {
    fn scheme(&self) -> &'static str {
        "legacy"
    }

    fn hash(&self, clear: &str) -> Result<String, HashError> {
        Ok(Self::digest(clear))
    }
}

/// Argon2Hasher
///
/// Salted, memory-hard Argon2id hashing with the crate's default parameters.
/// Output is a PHC string, so the salt and parameters travel with the hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn scheme(&self) -> &'static str {
        "argon2"
    }

    fn hash(&self, clear: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(clear.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| HashError(e.to_string()))
    }

    fn verify(&self, clear: &str, stored: &str) -> bool {
        // Legacy Base64 digests are not PHC strings and simply fail to parse here.
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("stored hash is not a PHC string: {}", e);
                return false;
            }
        };
        Argon2::default()
            .verify_password(clear.as_bytes(), &parsed)
            .is_ok()
    }
}

/// HashScheme
///
/// Configuration-level selector between the available hashers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashScheme {
    #[default]
    Legacy,
    Argon2,
}

impl HashScheme {
    /// Parses the `PASSWORD_HASH_SCHEME` value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "legacy" | "sha256" => Some(HashScheme::Legacy),
            "argon2" | "argon2id" => Some(HashScheme::Argon2),
            _ => None,
        }
    }

    pub fn build(self) -> HasherState {
        match self {
            HashScheme::Legacy => Arc::new(LegacySha256Hasher),
            HashScheme::Argon2 => Arc::new(Argon2Hasher),
        }
    }
}
