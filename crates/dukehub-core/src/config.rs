use std::fmt;

use argon2::Params;
use uuid::Uuid;

/// Fixed id of the provisioned administrator.
pub const ADMIN_ID: Uuid = Uuid::from_u128(1);

/// Admin passwords that ship as defaults and must be replaced in production.
pub const PLACEHOLDER_ADMIN_PASSWORDS: &[&str] = &["admin123", "change-me"];

#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub admin: AdminProvisioning,
    /// Upper bound on `suggest` results.
    pub suggestion_limit: usize,
    pub hash_cost: HashCost,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            admin: AdminProvisioning::default(),
            suggestion_limit: 5,
            hash_cost: HashCost::default(),
        }
    }
}

/// The administrative account seeded at startup. This is the only way an
/// account ever gets `is_admin = true`.
#[derive(Clone)]
pub struct AdminProvisioning {
    pub email: String,
    pub username: String,
    pub password: String,
    pub bio: String,
}

impl AdminProvisioning {
    pub fn uses_placeholder_password(&self) -> bool {
        PLACEHOLDER_ADMIN_PASSWORDS.contains(&self.password.as_str())
    }
}

impl fmt::Debug for AdminProvisioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminProvisioning")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("bio", &self.bio)
            .finish()
    }
}

impl Default for AdminProvisioning {
    fn default() -> Self {
        Self {
            email: "admin@dukehub.com".into(),
            username: "admin".into(),
            password: "admin123".into(),
            bio: "Platform Administrator".into(),
        }
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashCost {
    /// Smallest parameters Argon2 accepts. Only for tests and local tooling.
    pub fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}
