//! Application context — unified state passed to every command handler.
//!
//! `AppContext` wires the production infrastructure once in `Cli::run()`;
//! command handlers only see `&AppContext`.

use std::process::ExitCode;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::services::approval::ApprovalService;
use crate::application::services::node::NodeService;
use crate::infra::approval_history::JsonlApprovalHistory;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::environment::LocalEnvironment;
use crate::infra::paths::ClawnodePaths;
use crate::infra::process_discovery::SystemProcessDiscovery;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Production node orchestrator.
pub type LocalNodeService =
    NodeService<TokioCommandRunner, SystemProcessDiscovery<TokioCommandRunner>, LocalEnvironment>;

/// Production approval gate.
pub type LocalApprovalService = ApprovalService<YamlConfigStore, JsonlApprovalHistory>;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    pub mode: OutputMode,
    pub paths: ClawnodePaths,
    pub node: LocalNodeService,
    /// Cancelled on Ctrl-C; long-running commands stop at the next await.
    pub cancel: CancellationToken,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when the `CI` or `CLAWNODE_YES` environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the clawnode home directory cannot be determined.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let paths = ClawnodePaths::from_env()?;
        let non_interactive =
            std::env::var_os("CI").is_some() || std::env::var_os("CLAWNODE_YES").is_some();
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let node = NodeService::new(
            TokioCommandRunner,
            SystemProcessDiscovery::new(TokioCommandRunner),
            LocalEnvironment::new(&paths),
        );

        // JSON mode keeps stdout machine-readable.
        let quiet = flags.output.quiet || flags.output.json;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, quiet),
            mode,
            paths,
            node,
            cancel: CancellationToken::new(),
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Approval gate reading its policy from `config.yaml` on every submit.
    #[must_use]
    pub fn approvals(&self) -> LocalApprovalService {
        ApprovalService::new(
            YamlConfigStore::new(self.paths.config_file()),
            JsonlApprovalHistory::new(self.paths.approvals_log()),
        )
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true`, returns `default` immediately
    /// without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}

/// Convert a numeric exit code into an [`ExitCode`].
#[must_use]
pub fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}
