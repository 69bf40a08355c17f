// ABOUTME: Lifecycle hooks for the deployment workflow.
// ABOUTME: Runs shell command strings configured per hook name.

use std::collections::HashMap;
use tokio::process::Command;

use crate::types::AppName;

/// Result of attempting a named hook.
///
/// Distinguishes "nothing to run" from "ran and succeeded" so callers
/// don't conflate the two; both count as passing at orchestration
/// decision points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// No command configured under this name.
    NotConfigured,
    /// Command ran and exited zero.
    Completed,
    /// Command exited non-zero, or could not be spawned at all.
    Failed { exit_code: Option<i32> },
}

impl HookOutcome {
    /// Whether the orchestrator may proceed past this hook.
    pub fn passed(&self) -> bool {
        !matches!(self, HookOutcome::Failed { .. })
    }
}

/// Context passed to hooks via environment variables.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub app: AppName,
    pub tag: String,
    pub previous_tag: Option<String>,
}

impl HookContext {
    /// Convert context to environment variables.
    pub fn to_env(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("CUTOVER_APP".to_string(), self.app.to_string());
        env.insert("CUTOVER_TAG".to_string(), self.tag.clone());
        if let Some(ref prev) = self.previous_tag {
            env.insert("CUTOVER_PREVIOUS_TAG".to_string(), prev.clone());
        }
        env
    }
}

/// Runs hooks from a string-keyed command map.
pub struct HookRunner {
    hooks: HashMap<String, String>,
}

impl HookRunner {
    /// Create a runner over the configured hook commands.
    pub fn new(hooks: HashMap<String, String>) -> Self {
        Self { hooks }
    }

    /// Check if a command is configured under the given hook name.
    pub fn is_configured(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Run the named hook, if configured.
    ///
    /// The command runs under `sh -c`, inheriting the parent environment
    /// plus `extra_env`; the overrides are scoped to this single
    /// execution.
    pub async fn run(&self, name: &str, extra_env: &HashMap<String, String>) -> HookOutcome {
        let Some(command) = self.hooks.get(name) else {
            tracing::debug!(hook = name, "no hook configured, skipping");
            return HookOutcome::NotConfigured;
        };

        tracing::info!(hook = name, command = %command, "running hook");

        // Hook output streams straight through to the operator's terminal.
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .envs(extra_env)
            .status()
            .await;

        match output {
            Ok(status) if status.success() => {
                tracing::info!(hook = name, "hook completed");
                HookOutcome::Completed
            }
            Ok(status) => {
                tracing::warn!(hook = name, exit_code = ?status.code(), "hook failed");
                HookOutcome::Failed {
                    exit_code: status.code(),
                }
            }
            Err(e) => {
                tracing::error!(hook = name, error = %e, "failed to spawn hook");
                HookOutcome::Failed { exit_code: None }
            }
        }
    }
}
