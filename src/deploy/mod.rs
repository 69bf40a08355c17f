// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports state markers and Deployment struct for compile-time safe workflows.

mod deployment;
mod error;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use error::DeployError;
pub use state::{
    CnamesResolved, Completed, Initialized, PostChecked, PreChecked, Rebalanced, SwapPlan, Swapped,
};
pub use transitions::{AFTER_SWAP_HOOK, BEFORE_PRE_HOOK, TAG_ENV_VAR};
