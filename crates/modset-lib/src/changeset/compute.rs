//! Raw change computation from the user's selections.
//!
//! No transitive dependency knowledge lives here; this layer only turns
//! explicit selections into operations and sweeps newly orphaned
//! auto-installs once.

use std::collections::HashSet;

use crate::registry::{RegistryView, InstalledPackage};
use super::{ChangeSet, DesiredOperation, Operation, OperationKind, PackageState, Reason, ResolutionContext};

/// Materialize the user's explicit intentions plus orphan cleanup.
///
/// Packages with no matching registry entry for the active criteria are
/// excluded from install consideration rather than failing the pass, and
/// autodetected packages are skipped entirely.
pub fn compute_user_changes<R: RegistryView>(states: &[PackageState], ctx: &ResolutionContext<'_, R>) -> ChangeSet {
	log::debug!("computing user change set over {} package states", states.len());
	let mut changes = ChangeSet::default();

	for state in states {
		/* Locally detected files have no registry entry and no operation semantics. */
		if state.autodetected {
			continue;
		}

		match &state.desired {
			DesiredOperation::None => {}

			DesiredOperation::Update { version } => {
				let Some(installed) = &state.installed else { continue };
				let target = match version {
					Some(v) => ctx.registry.package_by_version(&state.identifier, v),
					None => ctx.registry.latest_compatible(&state.identifier, ctx.criteria),
				};
				let Some(target) = target else { continue };
				/* No upgrade available, nothing to do. */
				if target.identifier.version <= installed.package.identifier.version {
					continue;
				}
				changes.insert(Operation::new(target.clone(), OperationKind::Update, Reason::ExplicitUser));
			}

			DesiredOperation::Replace => {
				let Some(installed) = &state.installed else { continue };
				changes.insert(Operation::new(installed.package.clone(), OperationKind::Replace, Reason::ExplicitUser));
			}

			DesiredOperation::Install { version } => {
				let target = match version {
					Some(v) => ctx.registry.package_by_version(&state.identifier, v),
					None => ctx.registry.latest_compatible(&state.identifier, ctx.criteria),
				};
				let Some(target) = target else { continue };
				match &state.installed {
					/* Already at the selected release. */
					Some(installed) if installed.package.identifier == target.identifier => {}
					/* Switching releases: drop the old one, add the new one. */
					Some(installed) => {
						changes.insert(Operation::new(installed.package.clone(), OperationKind::Remove, Reason::ExplicitUser));
						changes.insert(Operation::new(target.clone(), OperationKind::Install, Reason::ExplicitUser));
					}
					None => {
						changes.insert(Operation::new(target.clone(), OperationKind::Install, Reason::ExplicitUser));
					}
				}
			}

			DesiredOperation::Remove => {
				let Some(installed) = &state.installed else { continue };
				changes.insert(Operation::new(installed.package.clone(), OperationKind::Remove, Reason::ExplicitUser));
			}
		}
	}

	/* One sweep over one simulated snapshot; multi-level orphan chains are
	 * the downstream solver's job, not a fixpoint here. */
	let snapshot = installed_after_changes(&changes, ctx);
	for orphan in ctx.registry.find_removable_auto_installed(&snapshot, ctx.criteria) {
		log::debug!("{} is no longer used by anything after these changes", orphan.package.identifier);
		changes.insert(Operation::new(orphan.package, OperationKind::Remove, Reason::NoLongerUsed));
	}

	changes
}

/// The installed records as they would look after `changes`, not including
/// any dependencies the solver would add.
///
/// Starts from the currently installed packages minus everything leaving
/// (Remove, and the old releases behind Update/Replace), then adds each
/// change's target.
pub(super) fn installed_after_changes<R: RegistryView>(changes: &ChangeSet, ctx: &ResolutionContext<'_, R>) -> Vec<InstalledPackage> {
	let leaving: HashSet<&str> = changes.iter()
		.filter(|op| !op.is_install())
		.map(|op| op.identifier())
		.collect();

	let mut snapshot: Vec<InstalledPackage> = ctx.registry.installed_packages().iter()
		.filter(|im| !leaving.contains(im.identifier()))
		.cloned()
		.collect();

	for op in changes.iter() {
		if op.is_remove() {
			continue;
		}
		let target = match op.kind {
			OperationKind::Replace => ctx.registry.get_replacement(&op.package, ctx.criteria).map(|r| r.replace_with),
			_ => Some(op.package.clone()),
		};
		if let Some(package) = target {
			snapshot.push(InstalledPackage { package, auto_installed: false });
		}
	}

	snapshot
}
