//! Platform-specific paths for profiles.
//!
//! Profiles live in a per-user directory resolved through the
//! platform's config-dir convention:
//!
//! - Linux: `~/.config/tonada/profiles/`
//! - macOS: `~/Library/Application Support/tonada/profiles/`
//! - Windows: `%APPDATA%\tonada\profiles\`
//!
//! # Example
//!
//! ```rust,no_run
//! use tonada_config::paths;
//!
//! if let Some(path) = paths::find_profile("warm") {
//!     println!("found profile at {:?}", path);
//! }
//! ```

use std::path::PathBuf;

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "tonada";

/// Subdirectory name for profiles.
const PROFILES_SUBDIR: &str = "profiles";

/// Returns the user-specific profiles directory.
///
/// Falls back to the current directory if the platform config
/// directory cannot be determined.
pub fn user_profiles_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PROFILES_SUBDIR)
}

/// Find a profile file by name or path.
///
/// A name that is already a readable file path wins; otherwise the
/// name (with `.toml` appended if missing) is looked up in the user
/// profiles directory.
pub fn find_profile(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = user_profiles_dir().join(&filename);
    if user_path.is_file() {
        return Some(user_path);
    }

    None
}

/// List the profile names present in the user profiles directory,
/// sorted. A missing directory is an empty list, not an error.
pub fn list_profiles() -> Vec<String> {
    let dir = user_profiles_dir();
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            } else {
                None
            }
        })
        .collect();
    names.sort();
    names
}

/// Ensure the user profiles directory exists, creating it (and any
/// parents) if needed. Returns the directory path.
pub fn ensure_user_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_profiles_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}
