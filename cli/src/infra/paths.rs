//! Locations of clawnode's own files.

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Overrides the clawnode home directory (default `~/.clawnode`).
pub const HOME_ENV: &str = "CLAWNODE_HOME";
/// Overrides the config file path.
pub const CONFIG_ENV: &str = "CLAWNODE_CONFIG";

/// Resolved file layout under the clawnode home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClawnodePaths {
    home: PathBuf,
    config: PathBuf,
}

impl ClawnodePaths {
    /// Resolve paths from `$CLAWNODE_HOME` / `$CLAWNODE_CONFIG`, falling back
    /// to `~/.clawnode`.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot
    /// be determined.
    pub fn from_env() -> Result<Self> {
        let home = match std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?
                .join(".clawnode"),
        };
        let mut paths = Self::with_home(home);
        if let Some(config) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            paths.config = PathBuf::from(config);
        }
        Ok(paths)
    }

    /// Layout rooted at an explicit directory (used in tests).
    #[must_use]
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            config: home.join("config.yaml"),
            home,
        }
    }

    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    #[must_use]
    pub fn config_file(&self) -> &Path {
        &self.config
    }

    #[must_use]
    pub fn token_file(&self) -> PathBuf {
        self.home.join("token")
    }

    #[must_use]
    pub fn node_log(&self) -> PathBuf {
        self.home.join("logs").join("node.log")
    }

    #[must_use]
    pub fn approvals_log(&self) -> PathBuf {
        self.home.join("approvals.jsonl")
    }
}

/// Create `path`'s parent directory if it has one.
pub(crate) fn ensure_parent(path: &Path) -> Result<()> {
    use anyhow::Context;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    Ok(())
}

/// Restrict a file to its owner.
pub(crate) fn set_owner_only(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use anyhow::Context;
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("cannot set permissions on {}", path.display()))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
