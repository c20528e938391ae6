use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AccountId = Uuid;
pub type PostId = Uuid;
pub type CommentId = Uuid;

/// A registered identity. Persisted as one element of the `users` slot.
///
/// `credential` holds an Argon2 PHC string, never the raw password.
/// Public views handed to the rendering layer carry an empty credential,
/// which is dropped from their JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub credential: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default)]
    pub followers: BTreeSet<AccountId>,
    #[serde(default)]
    pub following: BTreeSet<AccountId>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Capture the fields a post or comment freezes about its author.
    pub fn author_snapshot(&self) -> AuthorSnapshot {
        AuthorSnapshot {
            id: self.id,
            username: self.username.clone(),
            avatar: self.avatar.clone(),
            is_verified: self.is_verified,
        }
    }

    /// Copy of the account without its credential.
    pub fn public_view(&self) -> Account {
        Account {
            credential: String::new(),
            ..self.clone()
        }
    }
}

/// Author fields frozen at the time a post or comment was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSnapshot {
    pub id: AccountId,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: AuthorSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub author: AuthorSnapshot,
    /// Shared base counter. Per-viewer like state never reaches storage.
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
}

/// Partial profile edit. `None` leaves a field unchanged, `Some` overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.bio.is_none() && self.location.is_none() && self.website.is_none() && self.avatar.is_none()
    }

    pub fn apply(&self, account: &mut Account) {
        if let Some(bio) = &self.bio {
            account.bio = Some(bio.clone());
        }
        if let Some(location) = &self.location {
            account.location = Some(location.clone());
        }
        if let Some(website) = &self.website {
            account.website = Some(website.clone());
        }
        if let Some(avatar) = &self.avatar {
            account.avatar = Some(avatar.clone());
        }
    }
}

/// Counters shown on a profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub followers: usize,
    pub following: usize,
    pub posts: usize,
}

/// Contents of the `session` slot: which account was signed in when the
/// process last ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub account_id: AccountId,
    pub username: String,
    pub authenticated_at: DateTime<Utc>,
}
