// ABOUTME: Error types for deployment orchestration.
// ABOUTME: Every variant is a terminal abort of the workflow.

use crate::platform::PlatformError;
use crate::types::AppName;

/// Errors that abort the deployment workflow.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A configured lifecycle hook exited non-zero or could not run.
    #[error("hook '{name}' failed")]
    HookFailed {
        name: String,
        exit_code: Option<i32>,
    },

    /// Both slots hold cnames, so the live side cannot be determined.
    #[error("both {blue} and {green} hold cnames, routing state is ambiguous")]
    AmbiguousCnames { blue: AppName, green: AppName },

    /// Scale-up of the incoming slot was rejected.
    #[error("failed to add units to {app}")]
    ScaleUpFailed { app: AppName },

    /// One or more process groups on the outgoing slot failed to scale
    /// down; every group was still attempted before this was raised.
    #[error("failed to remove units from {app}")]
    ScaleDownFailed { app: AppName },

    /// Cname removal from the outgoing slot was rejected.
    #[error("failed to remove cnames from {app}")]
    CnameRemovalFailed { app: AppName },

    /// Cname attachment to the incoming slot was rejected.
    #[error("failed to set cnames on {app}")]
    CnameSetFailed { app: AppName },

    /// Control-plane transport failure.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}
