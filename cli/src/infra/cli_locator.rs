//! Locates the `openclaw` executable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::application::ports::CliLocator;

/// Explicit path to the `openclaw` executable.
pub const CLI_PATH_ENV: &str = "OPENCLAW_CLI_PATH";

#[cfg(windows)]
const EXECUTABLE_NAMES: &[&str] = &["openclaw.exe", "openclaw.cmd", "openclaw.bat", "openclaw"];
#[cfg(not(windows))]
const EXECUTABLE_NAMES: &[&str] = &["openclaw"];

/// Searches `$OPENCLAW_CLI_PATH`, the npm global bin directory, then `PATH`.
#[derive(Debug, Clone, Default)]
pub struct PathCliLocator {
    override_path: Option<PathBuf>,
    search_dirs: Vec<PathBuf>,
}

impl PathCliLocator {
    /// Locator configured from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let override_path = std::env::var_os(CLI_PATH_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(override_path, npm_bin_dir(), std::env::var_os("PATH"))
    }

    /// Locator with explicit inputs (used in tests).
    #[must_use]
    pub fn new(
        override_path: Option<PathBuf>,
        npm_dir: Option<PathBuf>,
        path_var: Option<OsString>,
    ) -> Self {
        let mut search_dirs: Vec<PathBuf> = Vec::new();
        let from_path = path_var
            .as_deref()
            .map(|p| std::env::split_paths(p).collect::<Vec<_>>())
            .unwrap_or_default();
        for dir in npm_dir.into_iter().chain(from_path) {
            if !dir.as_os_str().is_empty() && !search_dirs.contains(&dir) {
                search_dirs.push(dir);
            }
        }
        Self {
            override_path,
            search_dirs,
        }
    }
}

impl CliLocator for PathCliLocator {
    fn find_cli(&self) -> Option<PathBuf> {
        if let Some(path) = self.override_path.as_deref().filter(|p| p.is_file()) {
            return Some(path.to_path_buf());
        }
        self.search_dirs
            .iter()
            .flat_map(|dir| EXECUTABLE_NAMES.iter().map(move |name| dir.join(name)))
            .find(|candidate| is_executable(candidate))
    }
}

/// npm's global install directory for the current user.
fn npm_bin_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::data_dir().map(|d| d.join("npm"))
    } else {
        dirs::home_dir().map(|h| h.join(".npm-global").join("bin"))
    }
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
