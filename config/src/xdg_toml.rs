//! Read `$XDG_CONFIG_HOME/<app>/config.toml`: the `[env]` table and the `[profile]` table.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

/// Path of the app's XDG config file, whether or not it exists.
pub fn config_path(app_name: &str) -> Result<PathBuf, LoadError> {
    let base = cross_xdg::BaseDirs::new().map_err(|e| LoadError::XdgPath(e.to_string()))?;
    Ok(base.config_home().join(app_name).join("config.toml"))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, String>,
    #[serde(default)]
    profile: Option<toml::Table>,
}

fn load_file(app_name: &str) -> Result<ConfigFile, LoadError> {
    let path = config_path(app_name)?;
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    Ok(toml::from_str(&content)?)
}

/// Env key-value pairs from `[env]`. Missing file or section returns an empty map.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    Ok(load_file(app_name)?.env)
}

/// The raw `[profile]` table, if the file has one.
pub fn load_profile(app_name: &str) -> Result<Option<toml::Table>, LoadError> {
    Ok(load_file(app_name)?.profile)
}
