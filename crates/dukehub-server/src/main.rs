mod config;
mod dispatch;

use dukehub_core::SessionManager;
use dukehub_core::media::{DataUrlResolver, MediaResolver, ObjectUrlResolver};
use dukehub_core::session::Collaborators;
use dukehub_db::Database;
use dukehub_types::commands::{Command, Reply};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::config::{Config, MediaMode};

/// Reads one JSON command per line on stdin and writes one JSON reply per
/// line on stdout. Stands in for the rendering layer; there is no network
/// listener.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays a clean reply stream
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dukehub_server=debug,dukehub_core=debug,dukehub_db=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let db = Database::open(&config.db_path)?;

    let media: Box<dyn MediaResolver> = match config.media_mode {
        MediaMode::ObjectUrl => Box::new(ObjectUrlResolver),
        MediaMode::DataUrl => Box::new(DataUrlResolver),
    };
    let collaborators = Collaborators {
        media,
        ..Default::default()
    };
    let mut core = SessionManager::open_with(db, config.core, collaborators)?;

    info!("DukeHub core ready, reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<Command>(line) {
            Ok(command) => dispatch::handle(&mut core, command),
            Err(e) => {
                warn!("Unparseable command: {}", e);
                Reply::Error {
                    kind: "BadRequest".into(),
                    message: e.to_string(),
                }
            }
        };

        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
