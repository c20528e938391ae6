use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{CommentRequest, CreatePostRequest, EditPostRequest, ImageUpload, LoginRequest, RegisterRequest};
use crate::models::{Account, Comment, Post, ProfileStats, ProfileUpdate};

/// Commands sent FROM the rendering layer TO the core, one JSON object per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all_fields = "camelCase")]
pub enum Command {
    Register(RegisterRequest),
    Login(LoginRequest),
    Logout,
    /// Currently signed-in account, if any
    Whoami,
    UpdateProfile(ProfileUpdate),
    UpdateAvatar(ImageUpload),
    Follow { user_id: Uuid },
    Unfollow { user_id: Uuid },
    CreatePost(CreatePostRequest),
    EditPost(EditPostRequest),
    DeletePost { post_id: Uuid },
    AddComment(CommentRequest),
    /// Flip this viewer's like on a post. Never persisted.
    ToggleLike { post_id: Uuid },
    Feed,
    Profile { username: String },
    Search { query: String },
    Suggest,
    Users,
    Verify { user_id: Uuid },
    Unverify { user_id: Uuid },
    IsAdmin,
}

/// Replies sent back to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all_fields = "camelCase")]
pub enum Reply {
    Ok,
    Account(Account),
    MaybeAccount(Option<Account>),
    Accounts(Vec<Account>),
    Post(Post),
    Posts(Vec<Post>),
    Comment(Comment),
    Profile {
        account: Account,
        stats: ProfileStats,
        posts: Vec<Post>,
    },
    Likes {
        post_id: Uuid,
        liked: bool,
        count: u64,
    },
    Flag { value: bool },
    /// A recoverable failure for display. `kind` names the error variant.
    Error { kind: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_adjacently_tagged_command() {
        let cmd: Command = serde_json::from_str(
            r#"{"type":"Register","data":{"email":"a@x.com","password":"pw","username":"a"}}"#,
        )
        .unwrap();
        assert!(matches!(cmd, Command::Register(ref r) if r.username == "a"));

        let cmd: Command = serde_json::from_str(r#"{"type":"Logout"}"#).unwrap();
        assert!(matches!(cmd, Command::Logout));
    }

    #[test]
    fn rejects_unknown_request_fields() {
        let res: Result<Command, _> = serde_json::from_str(
            r#"{"type":"Login","data":{"email":"a@x.com","password":"pw","admin":true}}"#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn field_names_are_camel_case_everywhere() {
        let id = Uuid::new_v4();

        let cmd: Command =
            serde_json::from_str(&format!(r#"{{"type":"Follow","data":{{"userId":"{id}"}}}}"#)).unwrap();
        assert!(matches!(cmd, Command::Follow { user_id } if user_id == id));

        let cmd: Command = serde_json::from_str(&format!(
            r#"{{"type":"EditPost","data":{{"postId":"{id}","content":"x"}}}}"#
        ))
        .unwrap();
        assert!(matches!(cmd, Command::EditPost(ref r) if r.post_id == id));

        let cmd: Command = serde_json::from_str(
            r#"{"type":"UpdateAvatar","data":{"contentType":"image/png","data":"AAAA"}}"#,
        )
        .unwrap();
        assert!(matches!(cmd, Command::UpdateAvatar(ref u) if u.content_type == "image/png"));

        // The old snake_case spelling no longer parses
        let res: Result<Command, _> =
            serde_json::from_str(&format!(r#"{{"type":"DeletePost","data":{{"post_id":"{id}"}}}}"#));
        assert!(res.is_err());

        let reply = serde_json::to_value(Reply::Likes {
            post_id: id,
            liked: true,
            count: 1,
        })
        .unwrap();
        assert_eq!(reply["data"]["postId"], id.to_string());
        assert!(reply["data"].get("post_id").is_none());
    }
}
