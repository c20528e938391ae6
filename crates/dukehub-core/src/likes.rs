use std::collections::HashSet;

use dukehub_types::models::{Post, PostId};

/// One viewer's liked posts for the current run. Kept apart from the stored
/// counter on purpose: nothing here is ever written to the store.
#[derive(Debug, Clone, Default)]
pub struct LikeOverlay {
    liked: HashSet<PostId>,
}

impl LikeOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the like on `post`. Returns the new state.
    pub fn toggle(&mut self, post: PostId) -> bool {
        if self.liked.remove(&post) {
            false
        } else {
            self.liked.insert(post);
            true
        }
    }

    pub fn is_liked(&self, post: PostId) -> bool {
        self.liked.contains(&post)
    }

    /// Stored counter plus this viewer's own like.
    pub fn display_likes(&self, post: &Post) -> u64 {
        post.likes + u64::from(self.is_liked(post.id))
    }

    pub fn clear(&mut self) {
        self.liked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dukehub_types::models::AuthorSnapshot;
    use uuid::Uuid;

    fn post(likes: u64) -> Post {
        Post {
            id: Uuid::new_v4(),
            content: "hi".into(),
            image: None,
            author: AuthorSnapshot {
                id: Uuid::new_v4(),
                username: "alice".into(),
                avatar: None,
                is_verified: false,
            },
            likes,
            comments: vec![],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn toggle_flips_display_count_only() {
        let p = post(3);
        let mut overlay = LikeOverlay::new();
        assert_eq!(overlay.display_likes(&p), 3);

        assert!(overlay.toggle(p.id));
        assert_eq!(overlay.display_likes(&p), 4);
        assert_eq!(p.likes, 3);

        assert!(!overlay.toggle(p.id));
        assert_eq!(overlay.display_likes(&p), 3);
    }

    #[test]
    fn clear_forgets_everything() {
        let p = post(0);
        let mut overlay = LikeOverlay::new();
        overlay.toggle(p.id);
        overlay.clear();
        assert!(!overlay.is_liked(p.id));
    }
}
