use std::path::Path;

use serde::Serialize;

use crate::{args::ConfigArgs, profile::Profile};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Serialize)]
pub struct AppConfig {
    pub profile_path: String,
    pub server_url: String,
    pub page_size: usize,
    pub profile_exists: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            profile_path: "./".to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            profile_exists: false,
        }
    }
}

impl AppConfig {
    /// Resolution order: command-line flag (or its env var, handled by
    /// clap) > profile file > built-in default.
    pub fn from_args(args: ConfigArgs, profile_path: &Path, profile: Option<&Profile>) -> Self {
        let defaults = AppConfig::default();

        let server_url = args
            .server
            .or_else(|| profile.and_then(|p| p.server_url.clone()))
            .unwrap_or(defaults.server_url);

        let page_size = profile
            .and_then(|p| p.page_size)
            .filter(|size| *size > 0)
            .unwrap_or(defaults.page_size);

        AppConfig {
            profile_exists: profile.is_some(),
            profile_path: profile_path
                .to_str()
                .map(|p| p.to_string())
                .unwrap_or(defaults.profile_path),
            server_url,
            page_size,
        }
    }
}
