use tracing::warn;

use dukehub_types::models::{Account, AccountId};

use crate::error::CoreError;

/// Proof that the active session belongs to an administrator. Privileged
/// mutations take one, so they cannot be reached without passing the guard.
#[derive(Debug)]
pub struct AdminCapability {
    admin_id: AccountId,
}

impl AdminCapability {
    pub fn admin_id(&self) -> AccountId {
        self.admin_id
    }
}

/// Stateless gate for verify/unverify and post edit/delete.
pub struct ModerationGuard;

impl ModerationGuard {
    pub fn require_admin(active: Option<&Account>) -> Result<AdminCapability, CoreError> {
        match active {
            Some(account) if account.is_admin => Ok(AdminCapability {
                admin_id: account.id,
            }),
            Some(account) => {
                warn!("Rejected privileged call from non-admin '{}'", account.username);
                Err(CoreError::Unauthorized)
            }
            None => Err(CoreError::Unauthorized),
        }
    }

    pub fn is_admin(active: Option<&Account>) -> bool {
        active.is_some_and(|a| a.is_admin)
    }
}
