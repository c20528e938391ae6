use chrono::Utc;
use tracing::{debug, info, warn};

use dukehub_db::{PersistentStore, StoreExt};
use dukehub_types::models::{
    Account, AccountId, Comment, Post, PostId, ProfileStats, ProfileUpdate, SessionSnapshot,
};

use crate::avatar::{AvatarGenerator, InitialsAvatars};
use crate::config::CoreConfig;
use crate::content::ContentStore;
use crate::credentials::CredentialHasher;
use crate::directory::IdentityDirectory;
use crate::error::CoreError;
use crate::graph::SocialGraph;
use crate::likes::LikeOverlay;
use crate::media::{MediaPayload, MediaResolver, ObjectUrlResolver};
use crate::moderation::ModerationGuard;

pub const USERS_SLOT: &str = "users";
pub const POSTS_SLOT: &str = "posts";
pub const SESSION_SLOT: &str = "session";

/// External producers of avatar and media references.
pub struct Collaborators {
    pub avatars: Box<dyn AvatarGenerator>,
    pub media: Box<dyn MediaResolver>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            avatars: Box::new(InitialsAvatars::default()),
            media: Box::new(ObjectUrlResolver),
        }
    }
}

/// The capability surface handed to the rendering layer.
///
/// Owns the directory and the posts, remembers which account is signed in
/// (by id only, so reads always see the directory's copy), and mirrors every
/// committed change to the store before it becomes visible.
pub struct SessionManager<S: PersistentStore> {
    store: S,
    config: CoreConfig,
    hasher: CredentialHasher,
    collaborators: Collaborators,
    directory: IdentityDirectory,
    content: ContentStore,
    active: Option<AccountId>,
    likes: LikeOverlay,
}

impl<S: PersistentStore> SessionManager<S> {
    pub fn open(store: S, config: CoreConfig) -> Result<Self, CoreError> {
        Self::open_with(store, config, Collaborators::default())
    }

    /// Hydrate from the store. Missing or malformed slots start empty; the
    /// administrator is seeded if absent. Malformed users and posts are kept
    /// under `<slot>.corrupt` before anything is written back.
    pub fn open_with(store: S, config: CoreConfig, collaborators: Collaborators) -> Result<Self, CoreError> {
        let hasher = CredentialHasher::new(config.hash_cost)?;

        let accounts: Vec<Account> = store.load_or_quarantine(USERS_SLOT)?.unwrap_or_default();
        let mut directory = IdentityDirectory::from_accounts(accounts);
        if directory.seed_admin(&config.admin, &hasher, collaborators.avatars.as_ref(), Utc::now())? {
            store.save(USERS_SLOT, directory.accounts())?;
        }
        if config.admin.uses_placeholder_password() {
            warn!("Administrator password is a placeholder; set DUKEHUB_ADMIN_PASSWORD");
        }

        let posts: Vec<Post> = store.load_or_quarantine(POSTS_SLOT)?.unwrap_or_default();
        let content = ContentStore::from_posts(posts);

        let active = match store.load::<SessionSnapshot>(SESSION_SLOT)? {
            Some(snapshot) if directory.get(snapshot.account_id).is_some() => {
                info!("Resumed session for '{}'", snapshot.username);
                Some(snapshot.account_id)
            }
            Some(snapshot) => {
                warn!(
                    "Persisted session for '{}' no longer resolves, starting anonymous",
                    snapshot.username
                );
                store.remove(SESSION_SLOT)?;
                None
            }
            None => None,
        };

        info!(
            "Core ready: {} accounts, {} posts",
            directory.len(),
            content.len()
        );

        Ok(Self {
            store,
            config,
            hasher,
            collaborators,
            directory,
            content,
            active,
            likes: LikeOverlay::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn directory(&self) -> &IdentityDirectory {
        &self.directory
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    // -- Session --

    pub fn is_authenticated(&self) -> bool {
        self.active_account().is_some()
    }

    /// The signed-in account as the directory currently holds it.
    pub fn current(&self) -> Option<Account> {
        self.active_account().map(Account::public_view)
    }

    pub fn is_admin(&self) -> bool {
        ModerationGuard::is_admin(self.active_account())
    }

    fn active_account(&self) -> Option<&Account> {
        self.active.and_then(|id| self.directory.get(id))
    }

    fn require_session(&self) -> Result<&Account, CoreError> {
        self.active_account().ok_or(CoreError::Unauthorized)
    }

    pub fn register(&mut self, email: &str, password: &str, username: &str) -> Result<Account, CoreError> {
        let previous = self.directory.clone();
        let account = commit_directory(&self.store, &mut self.directory, |dir| {
            dir.register(
                email,
                password,
                username,
                &self.hasher,
                self.collaborators.avatars.as_ref(),
                Utc::now(),
            )
            .map(Account::public_view)
        })?;

        if let Err(e) = self.start_session(&account) {
            // Registration and sign-in land together or not at all
            if let Err(rollback) = self.store.save(USERS_SLOT, previous.accounts()) {
                warn!("Failed to roll back users slot: {}", rollback);
            }
            self.directory = previous;
            return Err(e);
        }

        info!("Registered '{}'", account.username);
        Ok(account)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<Account, CoreError> {
        let account = match self.directory.authenticate(email, password, &self.hasher) {
            Ok(account) => account.public_view(),
            Err(e) => {
                debug!("Login rejected");
                return Err(e);
            }
        };
        self.start_session(&account)?;
        info!("'{}' signed in", account.username);
        Ok(account)
    }

    pub fn logout(&mut self) -> Result<(), CoreError> {
        if self.active.is_none() {
            return Ok(());
        }
        self.store.remove(SESSION_SLOT)?;
        self.active = None;
        self.likes.clear();
        info!("Signed out");
        Ok(())
    }

    fn start_session(&mut self, account: &Account) -> Result<(), CoreError> {
        let snapshot = SessionSnapshot {
            account_id: account.id,
            username: account.username.clone(),
            authenticated_at: Utc::now(),
        };
        self.store.save(SESSION_SLOT, &snapshot)?;
        self.active = Some(account.id);
        self.likes.clear();
        Ok(())
    }

    // -- Profile --

    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Account, CoreError> {
        let id = self.require_session()?.id;
        let account = commit_directory(&self.store, &mut self.directory, |dir| {
            dir.update_profile(id, update).map(Account::public_view)
        })?;
        debug!("Profile updated for '{}'", account.username);
        Ok(account)
    }

    pub fn update_avatar(&mut self, payload: &MediaPayload) -> Result<Account, CoreError> {
        self.require_session()?;
        let reference = self.collaborators.media.resolve(payload)?;
        self.update_profile(&ProfileUpdate {
            avatar: Some(reference),
            ..Default::default()
        })
    }

    pub fn get_by_username(&self, username: &str) -> Option<Account> {
        self.directory
            .find_by_username(username)
            .map(Account::public_view)
    }

    pub fn profile_stats(&self, username: &str) -> Result<ProfileStats, CoreError> {
        let account = self
            .directory
            .find_by_username(username)
            .ok_or_else(|| CoreError::NotFound(format!("user '{}'", username)))?;
        Ok(ProfileStats {
            followers: account.followers.len(),
            following: account.following.len(),
            posts: self.content.posts_by(account.id).len(),
        })
    }

    // -- Graph --

    /// Follow `target` as the signed-in account. Returns the updated actor.
    pub fn follow(&mut self, target: AccountId) -> Result<Account, CoreError> {
        let actor = self.require_session()?.id;
        let account = commit_directory(&self.store, &mut self.directory, |dir| {
            SocialGraph::new(dir).follow(actor, target)?;
            dir.require(actor).map(Account::public_view)
        })?;
        debug!("'{}' follows {}", account.username, target);
        Ok(account)
    }

    pub fn unfollow(&mut self, target: AccountId) -> Result<Account, CoreError> {
        let actor = self.require_session()?.id;
        let account = commit_directory(&self.store, &mut self.directory, |dir| {
            SocialGraph::new(dir).unfollow(actor, target)?;
            dir.require(actor).map(Account::public_view)
        })?;
        debug!("'{}' unfollowed {}", account.username, target);
        Ok(account)
    }

    pub fn is_following(&self, target: AccountId) -> bool {
        self.active_account()
            .is_some_and(|a| a.following.contains(&target))
    }

    pub fn search(&self, query: &str) -> Vec<Account> {
        self.directory
            .search(query)
            .into_iter()
            .map(Account::public_view)
            .collect()
    }

    /// Up to `suggestion_limit` accounts to follow. Empty when anonymous.
    pub fn suggest(&self) -> Vec<Account> {
        let Some(me) = self.active else {
            return Vec::new();
        };
        self.directory
            .suggest(me, self.config.suggestion_limit)
            .into_iter()
            .map(Account::public_view)
            .collect()
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.directory
            .accounts()
            .iter()
            .map(Account::public_view)
            .collect()
    }

    // -- Posts --

    pub fn posts(&self) -> &[Post] {
        self.content.posts()
    }

    pub fn posts_by(&self, author: AccountId) -> Vec<Post> {
        self.content.posts_by(author).into_iter().cloned().collect()
    }

    pub fn create_post(&mut self, content: &str, image: Option<&MediaPayload>) -> Result<Post, CoreError> {
        let author = self.require_session()?.clone();
        if content.trim().is_empty() && image.is_none() {
            return Err(CoreError::EmptyPost);
        }
        let image = image
            .map(|payload| self.collaborators.media.resolve(payload))
            .transpose()?;

        let post = commit_posts(&self.store, &mut self.content, |posts| {
            posts.create_post(&author, content, image, Utc::now()).cloned()
        })?;
        info!("'{}' created post {}", author.username, post.id);
        Ok(post)
    }

    pub fn edit_post(&mut self, post_id: PostId, content: &str) -> Result<Post, CoreError> {
        let cap = ModerationGuard::require_admin(self.active_account())?;
        let post = commit_posts(&self.store, &mut self.content, |posts| {
            posts.edit_post(&cap, post_id, content).cloned()
        })?;
        info!("Admin {} edited post {}", cap.admin_id(), post_id);
        Ok(post)
    }

    pub fn delete_post(&mut self, post_id: PostId) -> Result<Post, CoreError> {
        let cap = ModerationGuard::require_admin(self.active_account())?;
        let post = commit_posts(&self.store, &mut self.content, |posts| {
            posts.delete_post(&cap, post_id)
        })?;
        info!("Admin {} deleted post {}", cap.admin_id(), post_id);
        Ok(post)
    }

    pub fn add_comment(&mut self, post_id: PostId, content: &str) -> Result<Comment, CoreError> {
        let commenter = self.require_session()?.clone();
        let comment = commit_posts(&self.store, &mut self.content, |posts| {
            posts.add_comment(post_id, content, &commenter).cloned()
        })?;
        debug!("'{}' commented on post {}", commenter.username, post_id);
        Ok(comment)
    }

    /// Flip the viewer's like. Returns the new state and the count to display.
    /// Only the in-memory overlay changes.
    pub fn toggle_like(&mut self, post_id: PostId) -> Result<(bool, u64), CoreError> {
        let post = self
            .content
            .get(post_id)
            .ok_or_else(|| CoreError::NotFound(format!("post {}", post_id)))?;
        let liked = self.likes.toggle(post_id);
        Ok((liked, self.likes.display_likes(post)))
    }

    pub fn display_likes(&self, post: &Post) -> u64 {
        self.likes.display_likes(post)
    }

    // -- Moderation --

    pub fn verify(&mut self, account_id: AccountId) -> Result<Account, CoreError> {
        self.set_verified(account_id, true)
    }

    pub fn unverify(&mut self, account_id: AccountId) -> Result<Account, CoreError> {
        self.set_verified(account_id, false)
    }

    fn set_verified(&mut self, account_id: AccountId, verified: bool) -> Result<Account, CoreError> {
        let cap = ModerationGuard::require_admin(self.active_account())?;
        let account = commit_directory(&self.store, &mut self.directory, |dir| {
            dir.set_verified(&cap, account_id, verified)
                .map(Account::public_view)
        })?;
        info!(
            "Admin {} set verified={} on '{}'",
            cap.admin_id(),
            verified,
            account.username
        );
        Ok(account)
    }
}

/// Apply `f` to a copy of the directory, persist the copy, then swap it in.
/// Any failure leaves `directory` untouched.
fn commit_directory<S, T, F>(store: &S, directory: &mut IdentityDirectory, f: F) -> Result<T, CoreError>
where
    S: PersistentStore,
    F: FnOnce(&mut IdentityDirectory) -> Result<T, CoreError>,
{
    let mut staged = directory.clone();
    let out = f(&mut staged)?;
    store.save(USERS_SLOT, staged.accounts())?;
    *directory = staged;
    Ok(out)
}

/// Same contract as [`commit_directory`], for the post sequence.
fn commit_posts<S, T, F>(store: &S, content: &mut ContentStore, f: F) -> Result<T, CoreError>
where
    S: PersistentStore,
    F: FnOnce(&mut ContentStore) -> Result<T, CoreError>,
{
    let mut staged = content.clone();
    let out = f(&mut staged)?;
    store.save(POSTS_SLOT, staged.posts())?;
    *content = staged;
    Ok(out)
}
