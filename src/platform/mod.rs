// ABOUTME: Capability trait for the PaaS control-plane API.
// ABOUTME: Covers cname management, env vars, and unit scaling.

mod http;

pub use http::ControlPlane;

use crate::types::AppName;
use async_trait::async_trait;
use nonempty::NonEmpty;
use std::collections::HashMap;

/// Direction of a unit-scaling operation. The delta passed alongside is
/// always a positive magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    Add,
    Remove,
}

/// Errors from control-plane operations.
///
/// Operations that report success as a boolean map non-2xx statuses to
/// `Ok(false)`, never to an error; `PlatformError` is reserved for
/// transport faults, unexpected statuses on reads, and responses the
/// client cannot interpret.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("request to control plane failed: {0}")]
    Transport(String),

    #[error("control plane returned {status} for {path}")]
    Status { status: u16, path: String },

    #[error("malformed control plane response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        PlatformError::Transport(err.to_string())
    }
}

/// Operations the deployment core needs from the control plane.
///
/// Injectable so the scaler and orchestrator can be driven by scripted
/// test doubles instead of a live API.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Cnames currently routed to the app, `None` when it has none.
    async fn get_cnames(&self, app: &AppName) -> Result<Option<NonEmpty<String>>, PlatformError>;

    /// Point the given cnames at the app. `Ok(true)` iff the control
    /// plane answered 2xx.
    async fn set_cnames(
        &self,
        app: &AppName,
        cnames: &NonEmpty<String>,
    ) -> Result<bool, PlatformError>;

    /// Detach the given cnames from the app. Same contract as
    /// [`set_cnames`](Self::set_cnames).
    async fn remove_cnames(
        &self,
        app: &AppName,
        cnames: &NonEmpty<String>,
    ) -> Result<bool, PlatformError>;

    /// Value of an environment variable, `None` when the variable is
    /// absent or its value is null.
    async fn get_env(&self, app: &AppName, key: &str) -> Result<Option<String>, PlatformError>;

    /// Set an environment variable on the app.
    async fn set_env(&self, app: &AppName, key: &str, value: &str)
    -> Result<bool, PlatformError>;

    /// Current unit counts grouped by process name. Empty map when the
    /// app reports no units.
    async fn unit_topology(&self, app: &AppName) -> Result<HashMap<String, u32>, PlatformError>;

    /// Add or remove `delta` units. Removal targets a single process;
    /// addition is app-level and passes no process.
    async fn scale_units(
        &self,
        app: &AppName,
        process: Option<&str>,
        delta: u32,
        direction: ScaleDirection,
    ) -> Result<bool, PlatformError>;
}
