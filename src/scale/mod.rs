// ABOUTME: Unit scaling over a single topology snapshot.
// ABOUTME: Computes per-process deltas and issues the minimal scale calls.

use crate::platform::{PlatformClient, PlatformError, ScaleDirection};
use crate::types::AppName;

/// Brings an app's process groups down (or up) to a target unit count.
///
/// Scaling decisions are made against a topology snapshot taken once at
/// the start of each call; the snapshot is never re-queried between the
/// individual per-process operations of that call.
pub struct UnitScaler<'a, P> {
    platform: &'a P,
}

impl<'a, P: PlatformClient> UnitScaler<'a, P> {
    pub fn new(platform: &'a P) -> Self {
        Self { platform }
    }

    /// Scale every process group down to at most `keep` units.
    ///
    /// Issues one removal call per process whose count strictly exceeds
    /// `keep`, with magnitude `count - keep`. A failed call marks the
    /// aggregate result false but does not stop the remaining process
    /// groups from being attempted, so one broken process type cannot
    /// block rebalancing of the others. An empty snapshot is vacuous
    /// success.
    pub async fn remove_units(&self, app: &AppName, keep: u32) -> Result<bool, PlatformError> {
        let topology = self.platform.unit_topology(app).await?;

        if topology.is_empty() {
            tracing::debug!(app = %app, "no units reported, nothing to remove");
            return Ok(true);
        }

        let mut all_ok = true;
        for (process, count) in &topology {
            if *count <= keep {
                continue;
            }

            let delta = count - keep;
            tracing::info!(app = %app, process = %process, delta, "removing units");

            match self
                .platform
                .scale_units(app, Some(process), delta, ScaleDirection::Remove)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!(app = %app, process = %process, "unit removal rejected");
                    all_ok = false;
                }
                Err(e) => {
                    tracing::warn!(app = %app, process = %process, error = %e, "unit removal failed");
                    all_ok = false;
                }
            }
        }

        Ok(all_ok)
    }

    /// Scale the app up to `desired_total` units overall.
    ///
    /// Already being at or above the target is an idempotent no-op.
    /// Scale-up is app-level: the control plane picks the process to
    /// grow, so a single aggregate call is issued.
    pub async fn add_units(&self, app: &AppName, desired_total: u32) -> Result<bool, PlatformError> {
        let topology = self.platform.unit_topology(app).await?;
        let current: u32 = topology.values().sum();

        if current >= desired_total {
            tracing::debug!(app = %app, current, desired_total, "already at target, nothing to add");
            return Ok(true);
        }

        let delta = desired_total - current;
        tracing::info!(app = %app, delta, "adding units");

        self.platform
            .scale_units(app, None, delta, ScaleDirection::Add)
            .await
    }
}
