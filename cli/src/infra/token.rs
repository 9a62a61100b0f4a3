//! File-backed gateway token storage.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use crate::application::ports::TokenStore;
use crate::infra::paths::{ensure_parent, set_owner_only};

/// Plain token file, readable only by its owner.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load_token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "cannot read token file");
                None
            }
        }
    }

    fn save_token(&self, token: &str) -> Result<()> {
        let token = token.trim();
        anyhow::ensure!(!token.is_empty(), "Token cannot be empty.");
        ensure_parent(&self.path)?;
        std::fs::write(&self.path, token)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        set_owner_only(&self.path)
    }

    fn clear_token(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(e).with_context(|| format!("cannot remove {}", self.path.display()))
            }
            _ => Ok(()),
        }
    }
}
