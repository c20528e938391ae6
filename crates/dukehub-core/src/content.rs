use chrono::{DateTime, Utc};
use uuid::Uuid;

use dukehub_types::models::{Account, AccountId, Comment, Post, PostId};

use crate::error::CoreError;
use crate::moderation::AdminCapability;

/// All posts, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentStore {
    posts: Vec<Post>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_posts(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn get(&self, id: PostId) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    fn require_mut(&mut self, id: PostId) -> Result<&mut Post, CoreError> {
        self.posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("post {}", id)))
    }

    /// Posts whose author snapshot names `author`, in feed order.
    pub fn posts_by(&self, author: AccountId) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.author.id == author).collect()
    }

    pub fn create_post(
        &mut self,
        author: &Account,
        content: &str,
        image: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&Post, CoreError> {
        if content.trim().is_empty() && image.is_none() {
            return Err(CoreError::EmptyPost);
        }

        let post = Post {
            id: Uuid::new_v4(),
            content: content.to_string(),
            image,
            author: author.author_snapshot(),
            likes: 0,
            comments: Vec::new(),
            created_at: now,
        };
        self.posts.insert(0, post);
        Ok(&self.posts[0])
    }

    /// Replace a post's text. Blank text is only allowed when the post has an image.
    pub fn edit_post(
        &mut self,
        _admin: &AdminCapability,
        id: PostId,
        content: &str,
    ) -> Result<&Post, CoreError> {
        let post = self.require_mut(id)?;
        if content.trim().is_empty() && post.image.is_none() {
            return Err(CoreError::EmptyPost);
        }
        post.content = content.to_string();
        Ok(&*post)
    }

    pub fn delete_post(&mut self, _admin: &AdminCapability, id: PostId) -> Result<Post, CoreError> {
        let idx = self
            .posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::NotFound(format!("post {}", id)))?;
        Ok(self.posts.remove(idx))
    }

    pub fn add_comment(
        &mut self,
        id: PostId,
        content: &str,
        commenter: &Account,
    ) -> Result<&Comment, CoreError> {
        let post = self.require_mut(id)?;
        if content.trim().is_empty() {
            return Err(CoreError::EmptyComment);
        }
        post.comments.push(Comment {
            id: Uuid::new_v4(),
            content: content.to_string(),
            author: commenter.author_snapshot(),
        });
        Ok(&post.comments[post.comments.len() - 1])
    }
}
