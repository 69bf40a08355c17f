// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: States carry the swap plan once cname resolution has produced one.

use crate::types::AppName;
use nonempty::NonEmpty;

/// What a cname swap will do, decided once during cname resolution.
///
/// The slot currently holding the cnames is the outgoing (live) side;
/// the other slot is the incoming deployment target.
#[derive(Debug, Clone)]
pub struct SwapPlan {
    pub outgoing: AppName,
    pub incoming: AppName,
    pub cnames: NonEmpty<String>,
    /// Revision recorded on the outgoing slot by a previous run, if any.
    pub previous_tag: Option<String>,
}

/// Initial state: config loaded, nothing run yet.
/// Available actions: `run_before_hook()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Pre-hook passed (or not configured).
/// Available actions: `resolve_cnames()`
#[derive(Debug, Clone, Copy, Default)]
pub struct PreChecked;

/// Cnames resolved: either a swap plan or nothing to swap.
/// Available actions: `rebalance_units()`
#[derive(Debug, Clone)]
pub struct CnamesResolved {
    pub(crate) plan: Option<SwapPlan>,
}

/// Unit counts aligned between the two slots.
/// Available actions: `swap_cnames()`
#[derive(Debug, Clone)]
pub struct Rebalanced {
    pub(crate) plan: Option<SwapPlan>,
}

/// Traffic moved to the incoming slot (or there was nothing to move).
/// Available actions: `run_after_hook()`
#[derive(Debug, Clone)]
pub struct Swapped {
    pub(crate) plan: Option<SwapPlan>,
}

/// Post-hook passed (or not configured).
/// Available actions: `notify()`
#[derive(Debug, Clone)]
pub struct PostChecked {
    pub(crate) plan: Option<SwapPlan>,
}

/// Terminal success state.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) swapped: bool,
}
