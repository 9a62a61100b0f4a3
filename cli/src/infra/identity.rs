//! Reads the agent's `node.json` identity file.

use std::path::PathBuf;

use tracing::debug;

use crate::application::ports::IdentitySource;
use crate::domain::identity::NodeIdentity;

/// Overrides the agent's state directory (default `~/.openclaw`).
pub const STATE_DIR_ENV: &str = "OPENCLAW_STATE_DIR";

#[derive(Debug, Clone)]
pub struct NodeJsonIdentity {
    path: Option<PathBuf>,
}

impl NodeJsonIdentity {
    /// `$OPENCLAW_STATE_DIR/node.json`, else `~/.openclaw/node.json`.
    #[must_use]
    pub fn from_env() -> Self {
        let dir = std::env::var_os(STATE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".openclaw")));
        Self {
            path: dir.map(|d| d.join("node.json")),
        }
    }

    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl IdentitySource for NodeJsonIdentity {
    fn load_identity(&self, fallback_name: Option<&str>) -> NodeIdentity {
        let Some(path) = &self.path else {
            return NodeIdentity::fallback(fallback_name);
        };
        match std::fs::read_to_string(path) {
            Ok(content) => NodeIdentity::parse(&content, fallback_name),
            Err(e) => {
                debug!(error = %e, path = %path.display(), "no node identity");
                NodeIdentity::fallback(fallback_name)
            }
        }
    }
}
