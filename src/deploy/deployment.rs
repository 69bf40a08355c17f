// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::config::Config;
use crate::types::AppName;

use super::state::{CnamesResolved, Completed, Initialized, PostChecked, Rebalanced, SwapPlan, Swapped};

/// A deployment run in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (like the
/// swap plan) directly in the state type, so the plan provably exists
/// in the states that need it.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) config: Config,
    pub(crate) tag: String,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    /// Start a deployment of the given revision tag.
    pub fn new(config: Config, tag: impl Into<String>) -> Self {
        Deployment {
            config,
            tag: tag.into(),
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    /// Get the base app name from config.
    pub fn app_name(&self) -> &AppName {
        &self.config.name
    }

    /// Get the revision tag being deployed.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the config.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Internal helper to move to the next state.
    pub(crate) fn with_state<T>(self, state: T) -> Deployment<T> {
        Deployment {
            config: self.config,
            tag: self.tag,
            state,
        }
    }
}

// State-specific accessors for the swap plan
impl Deployment<CnamesResolved> {
    /// The swap plan, `None` when neither slot holds cnames.
    pub fn plan(&self) -> Option<&SwapPlan> {
        self.state.plan.as_ref()
    }
}

impl Deployment<Rebalanced> {
    pub fn plan(&self) -> Option<&SwapPlan> {
        self.state.plan.as_ref()
    }
}

impl Deployment<Swapped> {
    pub fn plan(&self) -> Option<&SwapPlan> {
        self.state.plan.as_ref()
    }
}

impl Deployment<PostChecked> {
    pub fn plan(&self) -> Option<&SwapPlan> {
        self.state.plan.as_ref()
    }
}

impl Deployment<Completed> {
    /// Whether traffic actually moved, as opposed to the first-deploy
    /// shortcut where there was nothing to swap.
    pub fn swapped(&self) -> bool {
        self.state.swapped
    }

    /// Consume the deployment and return the config.
    pub fn finish(self) -> Config {
        self.config
    }
}
