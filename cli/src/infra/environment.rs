//! The production `NodeEnvironment`: every local collaborator of the node
//! orchestrator, wired from [`ClawnodePaths`].

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{ActivityLog, CliLocator, ConfigStore, IdentitySource, TokenStore};
use crate::domain::config::CompanionConfig;
use crate::domain::identity::NodeIdentity;
use crate::infra::activity_log::RollingActivityLog;
use crate::infra::cli_locator::PathCliLocator;
use crate::infra::config::YamlConfigStore;
use crate::infra::identity::NodeJsonIdentity;
use crate::infra::paths::ClawnodePaths;
use crate::infra::token::FileTokenStore;

#[derive(Debug, Clone)]
pub struct LocalEnvironment {
    pub locator: PathCliLocator,
    pub config: YamlConfigStore,
    pub token: FileTokenStore,
    pub identity: NodeJsonIdentity,
    pub activity: RollingActivityLog,
}

impl LocalEnvironment {
    /// Environment rooted at `paths`, discovering the CLI and the agent's
    /// identity from the process environment.
    #[must_use]
    pub fn new(paths: &ClawnodePaths) -> Self {
        Self {
            locator: PathCliLocator::from_env(),
            config: YamlConfigStore::new(paths.config_file()),
            token: FileTokenStore::new(paths.token_file()),
            identity: NodeJsonIdentity::from_env(),
            activity: RollingActivityLog::new(paths.node_log()),
        }
    }
}

impl CliLocator for LocalEnvironment {
    fn find_cli(&self) -> Option<PathBuf> {
        self.locator.find_cli()
    }
}

impl ConfigStore for LocalEnvironment {
    fn exists(&self) -> bool {
        self.config.exists()
    }

    fn load(&self) -> Result<CompanionConfig> {
        self.config.load()
    }

    fn save(&self, config: &CompanionConfig) -> Result<()> {
        self.config.save(config)
    }

    fn path(&self) -> Result<PathBuf> {
        self.config.path()
    }
}

impl TokenStore for LocalEnvironment {
    fn load_token(&self) -> Option<String> {
        self.token.load_token()
    }

    fn save_token(&self, token: &str) -> Result<()> {
        self.token.save_token(token)
    }

    fn clear_token(&self) -> Result<()> {
        self.token.clear_token()
    }
}

impl IdentitySource for LocalEnvironment {
    fn load_identity(&self, fallback_name: Option<&str>) -> NodeIdentity {
        self.identity.load_identity(fallback_name)
    }
}

impl ActivityLog for LocalEnvironment {
    fn append(&self, entry: &str) -> Result<()> {
        self.activity.append(entry)
    }
}
