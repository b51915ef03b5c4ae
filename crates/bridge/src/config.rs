#![forbid(unsafe_code)]

use std::path::PathBuf;

pub const STORAGE_DIR_ENV: &str = "NODEBOARD_STORAGE_DIR";
pub const DEFAULT_STORAGE_DIR: &str = ".nodeboard";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    pub storage_dir: PathBuf,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Relative paths resolve against the process working directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let storage_dir = lookup(STORAGE_DIR_ENV)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        Self { storage_dir }
    }
}
