use dukehub_core::media::MediaPayload;
use dukehub_core::{CoreError, SessionManager};
use dukehub_db::PersistentStore;
use dukehub_types::api::ImageUpload;
use dukehub_types::commands::{Command, Reply};

/// Run one command against the core. Failures become `Reply::Error` so the
/// caller can show them; nothing here is fatal.
pub fn handle<S: PersistentStore>(core: &mut SessionManager<S>, command: Command) -> Reply {
    match apply(core, command) {
        Ok(reply) => reply,
        Err(e) => Reply::Error {
            kind: e.kind().to_string(),
            message: e.to_string(),
        },
    }
}

fn decode(upload: &ImageUpload) -> Result<MediaPayload, CoreError> {
    MediaPayload::from_base64(upload.content_type.clone(), &upload.data)
}

fn apply<S: PersistentStore>(core: &mut SessionManager<S>, command: Command) -> Result<Reply, CoreError> {
    let reply = match command {
        Command::Register(req) => Reply::Account(core.register(&req.email, &req.password, &req.username)?),
        Command::Login(req) => Reply::Account(core.login(&req.email, &req.password)?),
        Command::Logout => {
            core.logout()?;
            Reply::Ok
        }
        Command::Whoami => Reply::MaybeAccount(core.current()),
        Command::UpdateProfile(update) => Reply::Account(core.update_profile(&update)?),
        Command::UpdateAvatar(upload) => Reply::Account(core.update_avatar(&decode(&upload)?)?),
        Command::Follow { user_id } => Reply::Account(core.follow(user_id)?),
        Command::Unfollow { user_id } => Reply::Account(core.unfollow(user_id)?),
        Command::CreatePost(req) => {
            let image = req.image.as_ref().map(decode).transpose()?;
            Reply::Post(core.create_post(&req.content, image.as_ref())?)
        }
        Command::EditPost(req) => Reply::Post(core.edit_post(req.post_id, &req.content)?),
        Command::DeletePost { post_id } => Reply::Post(core.delete_post(post_id)?),
        Command::AddComment(req) => Reply::Comment(core.add_comment(req.post_id, &req.content)?),
        Command::ToggleLike { post_id } => {
            let (liked, count) = core.toggle_like(post_id)?;
            Reply::Likes {
                post_id,
                liked,
                count,
            }
        }
        Command::Feed => Reply::Posts(core.posts().to_vec()),
        Command::Profile { username } => {
            let account = core
                .get_by_username(&username)
                .ok_or_else(|| CoreError::NotFound(format!("user '{}'", username)))?;
            Reply::Profile {
                stats: core.profile_stats(&username)?,
                posts: core.posts_by(account.id),
                account,
            }
        }
        Command::Search { query } => Reply::Accounts(core.search(&query)),
        Command::Suggest => Reply::Accounts(core.suggest()),
        Command::Users => Reply::Accounts(core.accounts()),
        Command::Verify { user_id } => Reply::Account(core.verify(user_id)?),
        Command::Unverify { user_id } => Reply::Account(core.unverify(user_id)?),
        Command::IsAdmin => Reply::Flag {
            value: core.is_admin(),
        },
    };
    Ok(reply)
}
