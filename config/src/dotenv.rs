//! Read a project `.env` file into a key-value map (applied to the environment in lib).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `.env` in `override_dir` if given, else in the current directory.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Parses `.env` without touching the process environment. Missing file returns an empty map.
///
/// Later lines win over earlier ones for the same key.
pub fn load_env_map(override_dir: Option<&Path>) -> Result<HashMap<String, String>, ::dotenv::Error> {
    let path = match dotenv_path(override_dir) {
        Some(p) => p,
        None => return Ok(HashMap::new()),
    };
    let mut out = HashMap::new();
    for item in ::dotenv::from_path_iter(&path)? {
        let (key, value) = item?;
        out.insert(key, value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_env(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), content).unwrap();
        dir
    }

    #[test]
    fn missing_file_returns_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = load_env_map(Some(dir.path())).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn reads_keys_comments_and_quotes() {
        let dir = write_env(
            "# api settings\nOPENAI_API_KEY=sk-test\nOPENAI_MODEL=\"gpt-4o-mini\"\n\nCLASSGEN_CATALOG='data/resources.json'\n",
        );
        let map = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(map.get("OPENAI_API_KEY").map(String::as_str), Some("sk-test"));
        assert_eq!(map.get("OPENAI_MODEL").map(String::as_str), Some("gpt-4o-mini"));
        assert_eq!(
            map.get("CLASSGEN_CATALOG").map(String::as_str),
            Some("data/resources.json")
        );
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn later_line_wins() {
        let dir = write_env("RUST_LOG=info\nRUST_LOG=debug\n");
        let map = load_env_map(Some(dir.path())).unwrap();
        assert_eq!(map.get("RUST_LOG").map(String::as_str), Some("debug"));
    }

    #[test]
    fn malformed_line_is_an_error() {
        let dir = write_env("NOT A VALID LINE\n");
        assert!(load_env_map(Some(dir.path())).is_err());
    }
}
