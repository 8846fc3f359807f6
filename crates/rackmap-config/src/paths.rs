//! Platform-specific paths for configuration and set files.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/rackmap/` (Linux), `~/Library/Application Support/rackmap/` (macOS), `%APPDATA%\rackmap\` (Windows)
//! - **Config file**: `<user config>/config.toml`
//! - **User sets**: `<user config>/sets/`
//!
//! # Example
//!
//! ```rust,no_run
//! use rackmap_config::paths;
//!
//! println!("config: {:?}", paths::config_file());
//! if let Some(path) = paths::find_set("studio") {
//!     println!("found set at {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "rackmap";

/// Subdirectory name for set files.
const SETS_SUBDIR: &str = "sets";

/// Config file name inside the user config directory.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the engine config file.
pub fn config_file() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Returns the user-specific set directory.
pub fn user_sets_dir() -> PathBuf {
    user_config_dir().join(SETS_SUBDIR)
}

/// Find a set file by name.
///
/// Accepts a path to a TOML file, or a set name (with or without `.toml`)
/// looked up in the user sets directory.
pub fn find_set(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = user_sets_dir().join(filename);
    user_path.is_file().then_some(user_path)
}

/// Ensure the user sets directory exists.
pub fn ensure_user_sets_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_sets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List set files in the user sets directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_sets() -> Vec<PathBuf> {
    list_sets_in_dir(&user_sets_dir())
}

fn list_sets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut sets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    sets.sort();
    sets
}

/// Get the set name from a file path (the file stem).
///
/// ```rust
/// use rackmap_config::paths::set_name_from_path;
/// use std::path::Path;
///
/// assert_eq!(set_name_from_path(Path::new("/x/studio.toml")), Some("studio".to_string()));
/// ```
pub fn set_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dirs_end_with_app_name() {
        assert!(user_config_dir().ends_with("rackmap"));
        assert!(config_file().ends_with("rackmap/config.toml"));
        assert!(user_sets_dir().ends_with("rackmap/sets"));
    }

    #[test]
    fn find_set_accepts_direct_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("live.toml");
        fs::write(&path, "name = \"x\"").unwrap();
        assert_eq!(find_set(path.to_str().unwrap()), Some(path));
    }

    #[test]
    fn lists_only_toml_files_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.toml"), "").unwrap();
        fs::write(dir.path().join("a.toml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        let names: Vec<String> = list_sets_in_dir(dir.path())
            .iter()
            .filter_map(|p| set_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn missing_dir_lists_nothing() {
        assert!(list_sets_in_dir(Path::new("/definitely/not/here")).is_empty());
    }
}
