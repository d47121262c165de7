use std::path::Path;

use crate::{app_config::AppConfig, profile::Profile};

pub fn init_cmd(config: &AppConfig, profile_path: &Path) -> Result<(), anyhow::Error> {
    if profile_path.exists() {
        println!("Profile already exists at {}", profile_path.display());
        return Ok(());
    }

    let profile = Profile {
        server_url: Some(config.server_url.clone()),
        page_size: Some(config.page_size),
    };
    profile.save(profile_path)?;

    println!("Profile created at {}", profile_path.display());

    Ok(())
}
