//! The change-set resolution engine.
//!
//! Converts per-package [`PackageState`] selections into a complete,
//! dependency-consistent, conflict-annotated [`Plan`]:
//!
//! 1. [`compute_user_changes()`] materializes the user's explicit choices plus
//! orphaned auto-install cleanup into a raw [`ChangeSet`].
//! 2. [`cascade()`] expands it with the removals those changes cause.
//! 3. [`resolve()`] hands the set to a [`RelationshipSolve`] implementation
//! and merges the solver's transitive install list into the final [`Plan`].
//!
//! [`resolve_changes()`] runs all three steps.
//!
//! The engine is a pure computation over an immutable snapshot: it never
//! mutates the states or the registry it reads, holds no state between
//! passes, and a run can be abandoned at any point with nothing to unwind.
//!
//! [`RelationshipSolve`]: crate::relationship_resolver::RelationshipSolve

use crate::registry::RegistryView;
use crate::registry::package::GameVersion;
use crate::relationship_resolver::RelationshipSolve;

mod state;
pub use state::PackageState;
pub use state::DesiredOperation;

mod operation;
pub use operation::Operation;
pub use operation::OperationKind;
pub use operation::Reason;
pub use operation::ChangeSet;
pub use operation::Plan;

mod compute;
pub use compute::compute_user_changes;

mod cascade;
pub use cascade::cascade;

mod bridge;
pub use bridge::resolve;

/// Everything an engine call needs from the surrounding application.
///
/// Passed explicitly into every call so the engine never reaches for global
/// application state.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a, R: RegistryView> {
	pub registry: &'a R,
	/// Game versions the current instance accepts; empty means no filtering.
	pub criteria: &'a [GameVersion],
}

/// Run the full pipeline: raw changes, removal cascades, solver merge.
pub fn resolve_changes<R, S>(states: &[PackageState], solver: &S, ctx: &ResolutionContext<'_, R>) -> Plan
where
	R: RegistryView,
	S: RelationshipSolve<R>,
{
	let raw = compute_user_changes(states, ctx);
	let cascaded = cascade(raw, ctx);
	resolve(cascaded, solver, ctx)
}
