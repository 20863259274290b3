use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

/// Remote tier settings, all from the environment. When absent the store
/// runs local-only.
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub base_url: String,
    pub anon_key: String,
    pub vision_url: Option<String>,
}

pub struct Config {
    pub cache_path: PathBuf,
    pub remote: Option<RemoteSettings>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "tally").context("Could not determine home directory")?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let cache_path = data_dir.join("tally.db");

        let remote = match (env_nonempty("TALLY_REMOTE_URL"), env_nonempty("TALLY_ANON_KEY")) {
            (Some(base_url), Some(anon_key)) => Some(RemoteSettings {
                base_url: base_url.trim_end_matches('/').to_string(),
                anon_key,
                vision_url: env_nonempty("TALLY_VISION_URL"),
            }),
            _ => None,
        };

        Ok(Config { cache_path, remote })
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
