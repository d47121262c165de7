use std::path::{Path, PathBuf};

use anyhow::{Context, Ok};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    pub server_url: Option<String>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl Profile {
    pub fn from_path(profile: &Path) -> anyhow::Result<Option<Self>> {
        if !profile.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(profile).context("Failed to read profile file")?;

        let profile: Self = toml::from_str(&contents).context("Failed to deserialize profile")?;

        Ok(Some(profile))
    }

    pub fn save(&self, profile_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = profile_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string(self).context("Failed to serialize profile")?;

        std::fs::write(profile_path, content).context("Failed to write profile")?;

        Ok(())
    }
}

/// Get the XDG config directory, respecting XDG_CONFIG_HOME
fn get_config_dir() -> PathBuf {
    if let std::result::Result::Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        // XDG_CONFIG_HOME is the base directory, add "study" subdirectory
        PathBuf::from(xdg_config).join("study")
    } else {
        directories::ProjectDirs::from("io", "studybank", "study")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Resolve the profile file: an explicit path wins, otherwise the default
/// location under the config dir
pub fn get_profile_path(arg_profile: &Option<String>) -> PathBuf {
    if let Some(path) = arg_profile {
        PathBuf::from(path)
    } else {
        get_config_dir().join("config.toml")
    }
}
