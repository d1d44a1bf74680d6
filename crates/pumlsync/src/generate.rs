//! Diagram generation command.

use std::path::PathBuf;

use clap::Args;
use pumlsync_config::{CliSettings, Config};
use pumlsync_diagrams::{PlantUmlRenderer, RenderOptions};
use pumlsync_github::{GitHost, GitHubClient, PushPayload, RepoRef, branch_payload};
use pumlsync_sync::{SyncConfig, TreeSynchronizer};
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for generating diagrams.
///
/// Inputs of the GitHub Action arrive as `INPUT_*` environment variables.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Push event payload file.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event: Option<PathBuf>,

    /// Checkout containing the changed files.
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Output directory for SVG files ("." writes next to each source).
    #[arg(long, env = "INPUT_PATH")]
    path: Option<String>,

    /// Message of the generated commit.
    #[arg(short, long, env = "INPUT_MESSAGE")]
    message: Option<String>,

    /// `PlantUML` server URL (default: public plantuml.com server).
    #[arg(long, env = "INPUT_SERVER")]
    server: Option<String>,

    /// Basic auth username for the `PlantUML` server.
    #[arg(long, env = "INPUT_USERNAME")]
    username: Option<String>,

    /// Basic auth password for the `PlantUML` server.
    #[arg(long, env = "INPUT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API URL.
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Repository as owner/name, used with --branch or --default-branch.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Use the head of this branch instead of a push event.
    #[arg(long, conflicts_with = "default_branch")]
    branch: Option<String>,

    /// Use the head of the default branch instead of a push event.
    #[arg(long)]
    default_branch: bool,

    /// Process these files instead of the files changed by the push.
    #[arg(long, num_args = 1..)]
    files: Vec<String>,

    /// Force-update the branch ref.
    #[arg(long)]
    force: bool,

    /// Preview changes without committing.
    #[arg(long)]
    dry_run: bool,

    /// Path to configuration file (default: auto-discover pumlsync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl GenerateArgs {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or synchronization fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let token = config.require_token()?;
        debug!(config_path = ?config.config_path, "Loaded configuration");

        let client = GitHubClient::new(&config.github.api_url, token);
        let renderer = PlantUmlRenderer::from_options(&RenderOptions {
            server: config.render.server.clone(),
            username: config.render.username.clone(),
            password: config.render.password.clone(),
        });
        let payload = self.payload(&client)?;

        let sync_config = SyncConfig {
            output_dir: config.output.output_dir().map(str::to_owned),
            message: config.output.message.clone(),
            force: config.github.force,
            workspace: self.workspace,
            files: (!self.files.is_empty()).then_some(self.files),
        };
        let sync = TreeSynchronizer::new(&client, &renderer, sync_config);

        if self.dry_run {
            output.plan(&sync.plan(&payload)?);
        } else {
            output.outcome(&sync.run(&payload)?);
        }

        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            output_path: self.path.clone(),
            message: self.message.clone(),
            server: self.server.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            force: self.force.then_some(true),
        }
    }

    /// Push payload from the event file, or built from a branch head.
    fn payload(&self, host: &dyn GitHost) -> Result<PushPayload, CliError> {
        if self.branch.is_some() || self.default_branch {
            let repo = self.repository()?;
            return Ok(branch_payload(host, &repo, self.branch.as_deref())?);
        }

        let event = self.event.as_deref().ok_or_else(|| {
            CliError::Validation(
                "push event required (--event or GITHUB_EVENT_PATH)".to_owned(),
            )
        })?;
        Ok(PushPayload::from_file(event)?)
    }

    fn repository(&self) -> Result<RepoRef, CliError> {
        let slug = self.repository.as_deref().ok_or_else(|| {
            CliError::Validation(
                "--repository (or GITHUB_REPOSITORY) required without a push event".to_owned(),
            )
        })?;
        RepoRef::parse(slug).ok_or_else(|| {
            CliError::Validation(format!("invalid repository \"{slug}\", expected owner/name"))
        })
    }
}
