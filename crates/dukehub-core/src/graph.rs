use dukehub_types::models::AccountId;

use crate::directory::IdentityDirectory;
use crate::error::CoreError;

/// Follow edges, stored on both endpoints of each edge inside the directory.
pub struct SocialGraph<'a> {
    directory: &'a mut IdentityDirectory,
}

impl<'a> SocialGraph<'a> {
    pub fn new(directory: &'a mut IdentityDirectory) -> Self {
        Self { directory }
    }

    /// Add `actor -> target`. Following an already-followed account changes
    /// nothing. Returns whether an edge was added.
    pub fn follow(&mut self, actor: AccountId, target: AccountId) -> Result<bool, CoreError> {
        if actor == target {
            return Err(CoreError::InvalidOperation("cannot follow yourself".into()));
        }
        // Resolve both ends before touching either
        self.directory.require(actor)?;
        self.directory.require(target)?;

        let added = self.directory.require_mut(actor)?.following.insert(target);
        self.directory.require_mut(target)?.followers.insert(actor);
        Ok(added)
    }

    /// Remove `actor -> target` if present. Returns whether an edge was removed.
    pub fn unfollow(&mut self, actor: AccountId, target: AccountId) -> Result<bool, CoreError> {
        self.directory.require(actor)?;

        let removed = self.directory.require_mut(actor)?.following.remove(&target);
        if let Some(account) = self.directory.get_mut(target) {
            account.followers.remove(&actor);
        }
        Ok(removed)
    }

    pub fn is_following(&self, actor: AccountId, target: AccountId) -> bool {
        self.directory
            .get(actor)
            .is_some_and(|a| a.following.contains(&target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::avatar::InitialsAvatars;
    use crate::config::HashCost;
    use crate::credentials::CredentialHasher;

    fn directory_with(names: &[&str]) -> (IdentityDirectory, Vec<AccountId>) {
        let hasher = CredentialHasher::new(HashCost::minimal()).unwrap();
        let mut dir = IdentityDirectory::new();
        let ids = names
            .iter()
            .map(|n| {
                dir.register(&format!("{n}@x.com"), "pw", n, &hasher, &InitialsAvatars::default(), Utc::now())
                    .unwrap()
                    .id
            })
            .collect();
        (dir, ids)
    }

    fn edges_consistent(dir: &IdentityDirectory) -> bool {
        dir.accounts().iter().all(|a| {
            a.following
                .iter()
                .all(|t| dir.get(*t).is_some_and(|b| b.followers.contains(&a.id)))
                && a.followers
                    .iter()
                    .all(|f| dir.get(*f).is_some_and(|b| b.following.contains(&a.id)))
        })
    }

    #[test]
    fn follow_is_idempotent() {
        let (mut dir, ids) = directory_with(&["alice", "bob"]);
        assert!(SocialGraph::new(&mut dir).follow(ids[0], ids[1]).unwrap());
        let once = dir.clone();
        assert!(!SocialGraph::new(&mut dir).follow(ids[0], ids[1]).unwrap());
        assert_eq!(dir, once);
        assert_eq!(dir.get(ids[1]).unwrap().followers.len(), 1);
    }

    #[test]
    fn self_follow_rejected_without_change() {
        let (mut dir, ids) = directory_with(&["alice"]);
        let before = dir.clone();
        let err = SocialGraph::new(&mut dir).follow(ids[0], ids[0]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation(_)));
        assert_eq!(dir, before);
    }

    #[test]
    fn follow_unknown_target_is_not_found() {
        let (mut dir, ids) = directory_with(&["alice"]);
        let before = dir.clone();
        let err = SocialGraph::new(&mut dir)
            .follow(ids[0], uuid::Uuid::new_v4())
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(dir, before);
    }

    #[test]
    fn unfollow_absent_edge_is_noop() {
        let (mut dir, ids) = directory_with(&["alice", "bob"]);
        let before = dir.clone();
        assert!(!SocialGraph::new(&mut dir).unfollow(ids[0], ids[1]).unwrap());
        assert_eq!(dir, before);
    }

    #[test]
    fn edges_stay_mirrored_across_sequences() {
        let (mut dir, ids) = directory_with(&["a", "b", "c", "d"]);
        let script = [
            (true, 0, 1),
            (true, 1, 0),
            (true, 2, 0),
            (false, 0, 1),
            (true, 3, 2),
            (true, 0, 1),
            (false, 2, 0),
            (false, 3, 3),
            (true, 0, 3),
        ];
        for (follow, a, b) in script {
            let mut graph = SocialGraph::new(&mut dir);
            if follow {
                graph.follow(ids[a], ids[b]).unwrap();
            } else {
                graph.unfollow(ids[a], ids[b]).unwrap();
            }
            assert!(edges_consistent(&dir));
        }

        let graph = SocialGraph::new(&mut dir);
        assert!(graph.is_following(ids[0], ids[1]));
        assert!(graph.is_following(ids[0], ids[3]));
        assert!(!graph.is_following(ids[2], ids[0]));
    }
}
