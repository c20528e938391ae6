use std::path::PathBuf;

use dukehub_core::{AdminProvisioning, CoreConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    ObjectUrl,
    DataUrl,
}

impl MediaMode {
    fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "object-url" => Ok(Self::ObjectUrl),
            "data-url" => Ok(Self::DataUrl),
            other => anyhow::bail!("DUKEHUB_MEDIA_MODE must be 'object-url' or 'data-url', got '{}'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub media_mode: MediaMode,
    pub core: CoreConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = AdminProvisioning::default();
        let admin = AdminProvisioning {
            email: lookup("DUKEHUB_ADMIN_EMAIL").unwrap_or(defaults.email),
            username: lookup("DUKEHUB_ADMIN_USERNAME").unwrap_or(defaults.username),
            password: lookup("DUKEHUB_ADMIN_PASSWORD").unwrap_or(defaults.password),
            bio: defaults.bio,
        };

        let media_mode = match lookup("DUKEHUB_MEDIA_MODE") {
            Some(value) => MediaMode::parse(&value)?,
            None => MediaMode::ObjectUrl,
        };

        Ok(Self {
            db_path: lookup("DUKEHUB_DB_PATH")
                .unwrap_or_else(|| "dukehub.db".into())
                .into(),
            media_mode,
            core: CoreConfig {
                admin,
                ..Default::default()
            },
        })
    }
}
