//! Load configuration from XDG `config.toml` and project `.env`, then apply to the process
//! environment with priority: **existing env > .env > XDG**.
//!
//! The same XDG file may carry a `[profile]` table with Creator Profile settings;
//! [`load_profile_table`] returns it unparsed so the caller owns the schema.

mod dotenv;
mod xdg_toml;

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] ::dotenv::Error),
}

/// Loads config from XDG `config.toml` and optional project `.env`, then sets environment
/// variables only for keys that are **not** already set (so existing env has highest priority).
///
/// Order of precedence when a key is missing in the process environment:
/// 1. Value from project `.env` (current directory or `override_dir` if given)
/// 2. Value from `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` table
///
/// * `app_name`: e.g. `"classgen"`, used for the XDG path `~/.config/<app_name>/config.toml`.
/// * `override_dir`: if `Some`, look for `.env` in this directory instead of `std::env::current_dir()`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<(), LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let dotenv_map = dotenv::load_env_map(override_dir)?;

    let mut keys: std::collections::HashSet<String> = xdg_map.keys().cloned().collect();
    keys.extend(dotenv_map.keys().cloned());

    for key in keys {
        if std::env::var_os(&key).is_some() {
            continue;
        }
        let value = dotenv_map
            .get(&key)
            .or_else(|| xdg_map.get(&key))
            .cloned();
        if let Some(v) = value {
            std::env::set_var(&key, v);
        }
    }

    Ok(())
}

/// Returns the `[profile]` table of `$XDG_CONFIG_HOME/<app_name>/config.toml`, or `None`
/// when the file or the table is absent.
pub fn load_profile_table(app_name: &str) -> Result<Option<toml::Table>, LoadError> {
    xdg_toml::load_profile(app_name)
}

/// Path of the XDG config file for `app_name` (it may not exist).
pub fn config_file_path(app_name: &str) -> Result<PathBuf, LoadError> {
    xdg_toml::config_path(app_name)
}

#[cfg(test)]
mod test_env {
    use std::path::Path;
    use std::sync::Mutex;

    static XDG_LOCK: Mutex<()> = Mutex::new(());

    /// Runs `f` with `XDG_CONFIG_HOME` pointed at `dir`, serialized across tests.
    pub fn with_xdg_home<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let _guard = XDG_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let prev = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", dir);
        let out = f();
        match prev {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env::with_xdg_home;
    use std::env;

    fn xdg_with(app: &str, content: &str) -> tempfile::TempDir {
        let xdg_dir = tempfile::tempdir().unwrap();
        let app_dir = xdg_dir.path().join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), content).unwrap();
        xdg_dir
    }

    #[test]
    fn existing_env_wins() {
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "CLASSGEN_TEST_EXISTING=from_dotenv\n",
        )
        .unwrap();
        env::set_var("CLASSGEN_TEST_EXISTING", "from_env");
        load_and_apply("classgen-config-nonexistent-app-xyz", Some(dotenv_dir.path())).unwrap();
        assert_eq!(env::var("CLASSGEN_TEST_EXISTING").as_deref(), Ok("from_env"));
        env::remove_var("CLASSGEN_TEST_EXISTING");
    }

    #[test]
    fn load_and_apply_no_config_ok() {
        let empty = tempfile::tempdir().unwrap();
        let r = load_and_apply("classgen-config-nonexistent-app-xyz", Some(empty.path()));
        assert!(r.is_ok());
    }

    #[test]
    fn dotenv_overrides_xdg() {
        let xdg_dir = xdg_with("classgen", "[env]\nCLASSGEN_TEST_PRIORITY = \"from_xdg\"\n");
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dotenv_dir.path().join(".env"),
            "CLASSGEN_TEST_PRIORITY=from_dotenv\n",
        )
        .unwrap();

        env::remove_var("CLASSGEN_TEST_PRIORITY");
        with_xdg_home(xdg_dir.path(), || {
            load_and_apply("classgen", Some(dotenv_dir.path())).unwrap()
        });
        let val = env::var("CLASSGEN_TEST_PRIORITY").unwrap();
        env::remove_var("CLASSGEN_TEST_PRIORITY");

        assert_eq!(val, "from_dotenv");
    }

    #[test]
    fn xdg_applied_when_no_dotenv() {
        let xdg_dir = xdg_with("classgen", "[env]\nCLASSGEN_TEST_XDG_ONLY = \"from_xdg\"\n");
        let empty_dir = tempfile::tempdir().unwrap();

        env::remove_var("CLASSGEN_TEST_XDG_ONLY");
        with_xdg_home(xdg_dir.path(), || {
            load_and_apply("classgen", Some(empty_dir.path())).unwrap()
        });
        let val = env::var("CLASSGEN_TEST_XDG_ONLY").unwrap();
        env::remove_var("CLASSGEN_TEST_XDG_ONLY");

        assert_eq!(val, "from_xdg");
    }

    #[test]
    fn invalid_xdg_toml_fails_with_xdg_parse_error() {
        let xdg_dir = xdg_with("classgen", "invalid [[[\n");
        let empty_dir = tempfile::tempdir().unwrap();
        let result = with_xdg_home(xdg_dir.path(), || {
            load_and_apply("classgen", Some(empty_dir.path()))
        });
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }

    #[test]
    fn malformed_dotenv_fails() {
        let dotenv_dir = tempfile::tempdir().unwrap();
        std::fs::write(dotenv_dir.path().join(".env"), "BROKEN LINE\n").unwrap();
        let result = load_and_apply("classgen-config-nonexistent-app-xyz", Some(dotenv_dir.path()));
        assert!(matches!(result, Err(LoadError::Dotenv(_))));
    }

    #[test]
    fn profile_table_is_returned_raw() {
        let xdg_dir = xdg_with("classgen", "[profile]\ncache_capacity = 8\n");
        let table = with_xdg_home(xdg_dir.path(), || load_profile_table("classgen"))
            .unwrap()
            .unwrap();
        assert_eq!(
            table.get("cache_capacity").and_then(|v| v.as_integer()),
            Some(8)
        );
    }
}
