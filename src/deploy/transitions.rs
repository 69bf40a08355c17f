// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::hooks::{HookContext, HookOutcome, HookRunner};
use crate::notify::Notifier;
use crate::platform::PlatformClient;
use crate::scale::UnitScaler;

use super::Deployment;
use super::error::DeployError;
use super::state::{
    CnamesResolved, Completed, Initialized, PostChecked, PreChecked, Rebalanced, SwapPlan, Swapped,
};

/// Env var on the slot apps recording which revision they serve.
pub const TAG_ENV_VAR: &str = "TAG";

/// Hook run before any remote state is touched.
pub const BEFORE_PRE_HOOK: &str = "before_pre";

/// Hook run after traffic has moved to the incoming slot.
pub const AFTER_SWAP_HOOK: &str = "after_swap";

impl<S> Deployment<S> {
    fn hook_context(&self, previous_tag: Option<&str>) -> HookContext {
        HookContext {
            app: self.config.name.clone(),
            tag: self.tag.clone(),
            previous_tag: previous_tag.map(str::to_string),
        }
    }
}

// =============================================================================
// Initialized -> PreChecked
// =============================================================================

impl Deployment<Initialized> {
    /// Run the `before_pre` hook.
    ///
    /// An unconfigured hook passes; a failing one aborts before any
    /// remote state has been touched.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::HookFailed` on a non-zero exit.
    #[must_use = "deployment state must be used"]
    pub async fn run_before_hook(
        self,
        hooks: &HookRunner,
    ) -> Result<Deployment<PreChecked>, DeployError> {
        let env = self.hook_context(None).to_env();
        match hooks.run(BEFORE_PRE_HOOK, &env).await {
            HookOutcome::Failed { exit_code } => Err(DeployError::HookFailed {
                name: BEFORE_PRE_HOOK.to_string(),
                exit_code,
            }),
            _ => Ok(self.with_state(PreChecked)),
        }
    }
}

// =============================================================================
// PreChecked -> CnamesResolved
// =============================================================================

impl Deployment<PreChecked> {
    /// Determine which slot is live and what there is to swap.
    ///
    /// The slot holding cnames is the outgoing side. Neither slot
    /// holding cnames means nothing to swap (first deploy); the rest of
    /// the workflow passes through without error.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::AmbiguousCnames` if both slots hold cnames,
    /// or a platform error if either lookup fails.
    #[must_use = "deployment state must be used"]
    pub async fn resolve_cnames<P: PlatformClient>(
        self,
        platform: &P,
    ) -> Result<Deployment<CnamesResolved>, DeployError> {
        let blue = self.config.name.blue_slot();
        let green = self.config.name.green_slot();

        let blue_cnames = platform.get_cnames(&blue).await?;
        let green_cnames = platform.get_cnames(&green).await?;

        let plan = match (blue_cnames, green_cnames) {
            (Some(_), Some(_)) => {
                return Err(DeployError::AmbiguousCnames { blue, green });
            }
            (Some(cnames), None) => Some((blue, green, cnames)),
            (None, Some(cnames)) => Some((green, blue, cnames)),
            (None, None) => {
                tracing::info!("neither slot holds cnames, nothing to swap");
                None
            }
        };

        let plan = match plan {
            Some((outgoing, incoming, cnames)) => {
                // Context only; a failed lookup must not abort the run.
                let previous_tag = match platform.get_env(&outgoing, TAG_ENV_VAR).await {
                    Ok(tag) => tag,
                    Err(e) => {
                        tracing::warn!(app = %outgoing, error = %e, "could not read recorded tag");
                        None
                    }
                };

                tracing::info!(
                    outgoing = %outgoing,
                    incoming = %incoming,
                    previous_tag = ?previous_tag,
                    "resolved swap plan"
                );

                Some(SwapPlan {
                    outgoing,
                    incoming,
                    cnames,
                    previous_tag,
                })
            }
            None => None,
        };

        Ok(self.with_state(CnamesResolved { plan }))
    }
}

// =============================================================================
// CnamesResolved -> Rebalanced
// =============================================================================

impl Deployment<CnamesResolved> {
    /// Align unit counts between the two slots.
    ///
    /// Grows the incoming slot to the outgoing slot's current total
    /// before the outgoing slot is scaled down to the configured
    /// `keep_units` floor. Scale-down tolerates per-process failures:
    /// every process group is attempted before an aggregate failure
    /// aborts. Vacuous when there is no swap plan.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ScaleUpFailed` / `ScaleDownFailed`, or a
    /// platform error if a topology snapshot cannot be taken.
    #[must_use = "deployment state must be used"]
    pub async fn rebalance_units<P: PlatformClient>(
        self,
        platform: &P,
    ) -> Result<Deployment<Rebalanced>, DeployError> {
        let Some(plan) = &self.state.plan else {
            tracing::debug!("no swap plan, skipping unit rebalance");
            return Ok(self.with_state(Rebalanced { plan: None }));
        };

        let scaler = UnitScaler::new(platform);

        let outgoing_topology = platform.unit_topology(&plan.outgoing).await?;
        let outgoing_total: u32 = outgoing_topology.values().sum();

        if outgoing_total > 0 {
            let added = scaler.add_units(&plan.incoming, outgoing_total).await?;
            if !added {
                return Err(DeployError::ScaleUpFailed {
                    app: plan.incoming.clone(),
                });
            }
        }

        let removed = scaler
            .remove_units(&plan.outgoing, self.config.keep_units)
            .await?;
        if !removed {
            return Err(DeployError::ScaleDownFailed {
                app: plan.outgoing.clone(),
            });
        }

        let plan = self.state.plan.clone();
        Ok(self.with_state(Rebalanced { plan }))
    }
}

// =============================================================================
// Rebalanced -> Swapped
// =============================================================================

impl Deployment<Rebalanced> {
    /// Move the cnames from the outgoing slot to the incoming slot.
    ///
    /// On success the deployed revision is recorded on the incoming
    /// slot's `TAG` env var; that write is best-effort and only logged
    /// on failure. Skipped when there is no swap plan.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::CnameRemovalFailed` / `CnameSetFailed`,
    /// or a platform error on transport failure.
    #[must_use = "deployment state must be used"]
    pub async fn swap_cnames<P: PlatformClient>(
        self,
        platform: &P,
    ) -> Result<Deployment<Swapped>, DeployError> {
        let Some(plan) = &self.state.plan else {
            tracing::debug!("no swap plan, skipping cname swap");
            return Ok(self.with_state(Swapped { plan: None }));
        };

        let removed = platform.remove_cnames(&plan.outgoing, &plan.cnames).await?;
        if !removed {
            return Err(DeployError::CnameRemovalFailed {
                app: plan.outgoing.clone(),
            });
        }

        let set = platform.set_cnames(&plan.incoming, &plan.cnames).await?;
        if !set {
            return Err(DeployError::CnameSetFailed {
                app: plan.incoming.clone(),
            });
        }

        tracing::info!(
            outgoing = %plan.outgoing,
            incoming = %plan.incoming,
            "cnames swapped"
        );

        match platform.set_env(&plan.incoming, TAG_ENV_VAR, &self.tag).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(app = %plan.incoming, "could not record deployed tag");
            }
            Err(e) => {
                tracing::warn!(app = %plan.incoming, error = %e, "could not record deployed tag");
            }
        }

        let plan = self.state.plan.clone();
        Ok(self.with_state(Swapped { plan }))
    }
}

// =============================================================================
// Swapped -> PostChecked
// =============================================================================

impl Deployment<Swapped> {
    /// Run the `after_swap` hook under the same policy as the pre hook.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::HookFailed` on a non-zero exit.
    #[must_use = "deployment state must be used"]
    pub async fn run_after_hook(
        self,
        hooks: &HookRunner,
    ) -> Result<Deployment<PostChecked>, DeployError> {
        let previous_tag = self
            .state
            .plan
            .as_ref()
            .and_then(|p| p.previous_tag.as_deref());
        let env = self.hook_context(previous_tag).to_env();

        match hooks.run(AFTER_SWAP_HOOK, &env).await {
            HookOutcome::Failed { exit_code } => Err(DeployError::HookFailed {
                name: AFTER_SWAP_HOOK.to_string(),
                exit_code,
            }),
            _ => {
                let plan = self.state.plan.clone();
                Ok(self.with_state(PostChecked { plan }))
            }
        }
    }
}

// =============================================================================
// PostChecked -> Completed
// =============================================================================

impl Deployment<PostChecked> {
    /// Tell the configured APM and webhook endpoints about the deploy.
    ///
    /// Best-effort: notification is not part of the deployment's
    /// success criterion, so this transition cannot fail.
    #[must_use = "deployment state must be used"]
    pub async fn notify(self, notifier: &Notifier) -> Deployment<Completed> {
        notifier.notify_apm(&self.tag).await;
        notifier.run_webhook(&self.tag).await;

        let swapped = self.state.plan.is_some();
        self.with_state(Completed { swapped })
    }
}
