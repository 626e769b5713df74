//! Converging actual role membership to policy decisions.
//!
//! - [`reconcile`] / [`apply_changes`]: per-member diff and application
//! - [`ReconciliationSweep`]: refresh + evaluate + reconcile orchestration

mod reconciler;
mod sweep;

pub use reconciler::{ApplyOutcome, RoleAction, RoleChange, apply_changes, reconcile};
pub use sweep::{ReconciliationSweep, SweepError, SweepKind, SweepPhase, SweepReport};
