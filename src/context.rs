//! Per-invocation application context.
//!
//! Owns the loaded configuration, the output formatter, the invocation
//! flags, and one lazy cell per external integration. Built once in `main`
//! after configuration load and passed by reference into every command
//! handler; there is no process-global slot.

use std::sync::Arc;

use crate::ai;
use crate::clients::github::{GithubClient, GithubError};
use crate::clients::grafana::{GrafanaClient, GrafanaError};
use crate::config::Config;
use crate::output::Formatter;
use crate::registry::{BuildError, Lazy};

pub struct Context {
    pub config: Config,
    pub output: Formatter,
    pub verbose: u8,
    pub dry_run: bool,

    ai: Lazy<ai::Client>,
    github: Lazy<GithubClient>,
    grafana: Lazy<GrafanaClient>,
}

impl Context {
    pub fn new(config: Config, output: Formatter, verbose: u8, dry_run: bool) -> Self {
        Self {
            config,
            output,
            verbose,
            dry_run,
            ai: Lazy::new(),
            github: Lazy::new(),
            grafana: Lazy::new(),
        }
    }

    /// The AI client, built on first access. A missing `[ai]` section still
    /// yields a client; its operations report the feature as disabled.
    pub async fn ai(&self) -> Result<Arc<ai::Client>, BuildError> {
        self.ai
            .get_or_init("ai", || ai::Client::new(self.config.ai.as_ref()))
            .await
    }

    /// The GitHub client, built on first access.
    pub async fn github(&self) -> Result<Arc<GithubClient>, BuildError> {
        self.github
            .get_or_init("github", || async {
                let cfg = self.config.github.as_ref().ok_or(GithubError::NotConfigured)?;
                GithubClient::new(cfg)
            })
            .await
    }

    /// The Grafana client, built on first access.
    pub async fn grafana(&self) -> Result<Arc<GrafanaClient>, BuildError> {
        self.grafana
            .get_or_init("grafana", || async {
                let cfg = self.config.grafana.as_ref().ok_or(GrafanaError::NotConfigured)?;
                GrafanaClient::new(cfg)
            })
            .await
    }

    /// Asks the user for confirmation; dry-run never confirms.
    pub fn confirm(&self, message: &str, default_value: bool) -> bool {
        if self.dry_run {
            return false;
        }
        self.output.confirm(message, default_value)
    }
}
