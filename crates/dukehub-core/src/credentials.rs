use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use tracing::warn;

#[cfg(test)]
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::HashCost;
use crate::error::CoreError;

/// Input for the stand-in hash verified when no account matches.
const ABSENT_ACCOUNT_PASSWORD: &str = "dukehub-absent-account";

/// Argon2id hashing for stored credentials.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    /// PHC string with the same cost as real credentials. Verifying against
    /// it makes a miss cost as much as a wrong password.
    dummy: String,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

impl CredentialHasher {
    pub fn new(cost: HashCost) -> Result<Self, CoreError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| CoreError::Credential(e.to_string()))?;
        let mut hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy: String::new(),
            #[cfg(test)]
            verifications: Arc::new(AtomicUsize::new(0)),
        };
        hasher.dummy = hasher.hash(ABSENT_ACCOUNT_PASSWORD)?;
        Ok(hasher)
    }

    /// Hash a password into a PHC string with a fresh salt.
    pub fn hash(&self, password: &str) -> Result<String, CoreError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CoreError::Credential(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Check a password against a stored PHC string. A stored value that is
    /// not a PHC string never matches.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self.verify_parsed(password, &parsed),
            Err(e) => {
                warn!("Stored credential is not a valid hash: {}", e);
                self.verify_dummy(password);
                false
            }
        }
    }

    /// Spend one full verification on a hash nobody owns. Called when the
    /// account lookup misses, so the miss takes as long as a real check.
    pub fn verify_dummy(&self, password: &str) {
        if let Ok(parsed) = PasswordHash::new(&self.dummy) {
            let _ = self.verify_parsed(password, &parsed);
        }
    }

    fn verify_parsed(&self, password: &str, parsed: &PasswordHash<'_>) -> bool {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);
        self.argon2
            .verify_password(password.as_bytes(), parsed)
            .is_ok()
    }

    /// Argon2 verifications run so far, shared across clones.
    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::new(HashCost::minimal()).unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let h = hasher();
        let stored = h.hash("pw1").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(h.verify("pw1", &stored));
        assert!(!h.verify("pw2", &stored));
    }

    #[test]
    fn salts_differ() {
        let h = hasher();
        assert_ne!(h.hash("same").unwrap(), h.hash("same").unwrap());
    }

    #[test]
    fn plain_text_credential_never_matches() {
        let h = hasher();
        assert!(!h.verify("admin123", "admin123"));
        // Still pays for one verification
        assert_eq!(h.verifications(), 1);
    }

    #[test]
    fn dummy_never_matches_and_costs_one_verification() {
        let h = hasher();
        h.verify_dummy(ABSENT_ACCOUNT_PASSWORD);
        h.verify_dummy("anything");
        assert_eq!(h.verifications(), 2);
    }

    #[test]
    fn rejects_invalid_cost() {
        let cost = HashCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(matches!(CredentialHasher::new(cost), Err(CoreError::Credential(_))));
    }
}
