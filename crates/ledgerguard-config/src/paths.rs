//! Where configuration files live.

use crate::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const USER_FILE: &str = "config.toml";
const PROJECT_FILE: &str = "ledgerguard.toml";
const LOCAL_FILE: &str = "ledgerguard.local.toml";

/// Configuration file locations. The user directory comes from XDG
/// discovery and may be absent.
pub struct Paths {
    user_dir: Option<PathBuf>,
}

impl Paths {
    pub fn new() -> Self {
        Self {
            user_dir: ProjectDirs::from("com", "Ledgerguard", "ledgerguard")
                .map(|dirs| dirs.config_dir().to_path_buf()),
        }
    }

    /// `~/.config/ledgerguard/config.toml` on Linux.
    pub fn user_config_file(&self) -> Result<PathBuf, ConfigError> {
        self.user_dir
            .as_ref()
            .map(|dir| dir.join(USER_FILE))
            .ok_or(ConfigError::NoUserConfigDir)
    }

    pub fn project_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(PROJECT_FILE)
    }

    /// Untracked per-checkout overrides.
    pub fn local_config_file(project_dir: impl AsRef<Path>) -> PathBuf {
        project_dir.as_ref().join(LOCAL_FILE)
    }

    /// Configuration files that exist, lowest precedence first.
    pub fn existing_files(&self, project_dir: &Path, include_user: bool) -> Vec<PathBuf> {
        let user = include_user
            .then(|| self.user_config_file().ok())
            .flatten();

        user.into_iter()
            .chain([
                Self::project_config_file(project_dir),
                Self::local_config_file(project_dir),
            ])
            .filter(|path| path.exists())
            .collect()
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}
