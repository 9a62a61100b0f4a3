//! Infrastructure implementation of the `ConfigStore` port.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clawnode_common::ApprovalPolicy;
use tracing::warn;

use crate::application::ports::{ConfigStore, PolicySource};
use crate::domain::config::CompanionConfig;
use crate::infra::paths::{ensure_parent, set_owner_only};

/// Production implementation of `ConfigStore` that uses a YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigStore for YamlConfigStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<CompanionConfig> {
        if !self.path.exists() {
            return Ok(CompanionConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(CompanionConfig::default());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }

    fn save(&self, config: &CompanionConfig) -> Result<()> {
        ensure_parent(&self.path)?;
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        // Atomic write via temp file in the same directory, then rename.
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from);
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .with_context(|| format!("cannot create temp file in {}", dir.display()))?;
        tmp.write_all(content.as_bytes())
            .context("cannot write config")?;
        set_owner_only(tmp.path())?;
        tmp.persist(&self.path)
            .with_context(|| format!("cannot write {}", self.path.display()))?;
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }
}

/// Re-reads the policy from disk on every call.
impl PolicySource for YamlConfigStore {
    fn current_policy(&self) -> ApprovalPolicy {
        self.load().map_or_else(
            |e| {
                warn!(error = %format!("{e:#}"), "unreadable config, prompting for approvals");
                ApprovalPolicy::Prompt
            },
            |c| c.approvals.policy,
        )
    }
}
