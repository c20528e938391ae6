use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use dukehub_types::models::{Account, AccountId, ProfileUpdate};

use crate::avatar::AvatarGenerator;
use crate::config::{ADMIN_ID, AdminProvisioning};
use crate::credentials::CredentialHasher;
use crate::error::CoreError;
use crate::moderation::AdminCapability;

/// All registered accounts, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdentityDirectory {
    accounts: Vec<Account>,
}

impl IdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub(crate) fn require(&self, id: AccountId) -> Result<&Account, CoreError> {
        self.get(id)
            .ok_or_else(|| CoreError::NotFound(format!("account {}", id)))
    }

    pub(crate) fn require_mut(&mut self, id: AccountId) -> Result<&mut Account, CoreError> {
        self.get_mut(id)
            .ok_or_else(|| CoreError::NotFound(format!("account {}", id)))
    }

    /// Exact, case-sensitive match.
    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.username == username)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.email == email)
    }

    /// Put the administrator first unless an account with its email exists.
    /// Returns whether the directory changed.
    pub fn seed_admin(
        &mut self,
        admin: &AdminProvisioning,
        hasher: &CredentialHasher,
        avatars: &dyn AvatarGenerator,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        if self.find_by_email(&admin.email).is_some() {
            return Ok(false);
        }
        if self.find_by_username(&admin.username).is_some() || self.get(ADMIN_ID).is_some() {
            warn!(
                "Cannot seed administrator '{}': username or id already in use",
                admin.username
            );
            return Ok(false);
        }

        let account = Account {
            id: ADMIN_ID,
            username: admin.username.clone(),
            email: admin.email.clone(),
            credential: hasher.hash(&admin.password)?,
            avatar: Some(avatars.avatar_for(&admin.username)),
            bio: Some(admin.bio.clone()),
            location: None,
            website: None,
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            is_verified: true,
            is_admin: true,
            created_at: now,
        };
        self.accounts.insert(0, account);
        info!("Seeded administrator account '{}'", admin.username);
        Ok(true)
    }

    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
        hasher: &CredentialHasher,
        avatars: &dyn AvatarGenerator,
        now: DateTime<Utc>,
    ) -> Result<&Account, CoreError> {
        if email.trim().is_empty() {
            return Err(CoreError::InvalidOperation("email is required".into()));
        }
        if username.trim().is_empty() {
            return Err(CoreError::InvalidOperation("username is required".into()));
        }
        if self.find_by_email(email).is_some() {
            return Err(CoreError::DuplicateEmail);
        }
        if self.find_by_username(username).is_some() {
            return Err(CoreError::DuplicateUsername);
        }

        let credential = hasher.hash(password)?;
        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            credential,
            avatar: Some(avatars.avatar_for(username)),
            bio: None,
            location: None,
            website: None,
            followers: BTreeSet::new(),
            following: BTreeSet::new(),
            is_verified: false,
            is_admin: false,
            created_at: now,
        };

        self.accounts.push(account);
        Ok(&self.accounts[self.accounts.len() - 1])
    }

    /// One error for unknown email and wrong password alike.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
        hasher: &CredentialHasher,
    ) -> Result<&Account, CoreError> {
        let Some(account) = self.find_by_email(email) else {
            // Same Argon2 cost as a wrong password, so timing does not leak the email
            hasher.verify_dummy(password);
            return Err(CoreError::InvalidCredentials);
        };
        if !hasher.verify(password, &account.credential) {
            return Err(CoreError::InvalidCredentials);
        }
        Ok(account)
    }

    /// Case-insensitive substring match on username or email, directory order.
    pub fn search(&self, query: &str) -> Vec<&Account> {
        let needle = query.to_lowercase();
        self.accounts
            .iter()
            .filter(|a| {
                a.username.to_lowercase().contains(&needle) || a.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Accounts `for_account` does not follow yet, excluding itself, in
    /// directory order.
    pub fn suggest(&self, for_account: AccountId, limit: usize) -> Vec<&Account> {
        let following = self
            .get(for_account)
            .map(|a| &a.following);
        self.accounts
            .iter()
            .filter(|a| a.id != for_account)
            .filter(|a| following.is_none_or(|f| !f.contains(&a.id)))
            .take(limit)
            .collect()
    }

    pub fn update_profile(
        &mut self,
        id: AccountId,
        update: &ProfileUpdate,
    ) -> Result<&Account, CoreError> {
        let account = self.require_mut(id)?;
        update.apply(account);
        Ok(&*account)
    }

    /// Toggle the verified badge. Only reachable with an admin capability.
    pub fn set_verified(
        &mut self,
        _admin: &AdminCapability,
        id: AccountId,
        verified: bool,
    ) -> Result<&Account, CoreError> {
        let account = self.require_mut(id)?;
        account.is_verified = verified;
        Ok(&*account)
    }
}
