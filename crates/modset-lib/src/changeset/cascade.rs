//! Removal cascades: reverse dependencies and newly orphaned auto-installs.

use crate::registry::RegistryView;
use crate::registry::package::Package;
use super::{compute, ChangeSet, Operation, OperationKind, Reason, ResolutionContext};

/// Expand `raw` with the removals it causes.
///
/// Deliberately a single pass: the reverse-dependency query runs once and the
/// orphan sweep runs once against the re-simulated snapshot. An auto-install
/// orphaned only by a second-order removal is left to the solver, which has
/// full dependency-graph visibility.
pub fn cascade<R: RegistryView>(raw: ChangeSet, ctx: &ResolutionContext<'_, R>) -> ChangeSet {
	let mut changes = raw;

	/* Reinstalls are not removals: an identifier with any install-like
	 * operation stays out of the removal set, whatever release it targets. */
	let removal_ids: Vec<String> = changes.iter()
		.filter(|op| op.is_remove())
		.map(|op| op.identifier().to_string())
		.filter(|id| !changes.iter().any(|op| !op.is_remove() && op.covers_identifier(id)))
		.collect();

	let mut installing = Vec::<Package>::new();
	for op in changes.iter() {
		match op.kind {
			OperationKind::Install | OperationKind::Update => installing.push(op.package.clone()),
			OperationKind::Replace => {
				if let Some(repl) = ctx.registry.get_replacement(&op.package, ctx.criteria) {
					installing.push(repl.replace_with);
				}
			}
			OperationKind::Remove => {}
		}
	}

	for dependent in ctx.registry.find_reverse_dependencies(&removal_ids, &installing) {
		/* Presentation data can be transiently inconsistent; an identifier we
		 * can't place is skipped, not fatal. */
		let Some(installed) = ctx.registry.installed_package(&dependent) else { continue };
		if changes.iter().any(|op| !op.is_remove() && op.covers_identifier(&dependent)) {
			continue;
		}
		/* Prefer the registry's version-matched entry over the raw installed
		 * record; fall back when the registry no longer carries that release. */
		let package = ctx.registry
			.package_by_version(&dependent, &installed.package.identifier.version)
			.cloned()
			.unwrap_or_else(|| installed.package.clone());
		log::debug!("{} is removed because a package it depends on is leaving", package.identifier);
		changes.insert(Operation::new(package, OperationKind::Remove, Reason::DependencyRemoved));
	}

	/* One more orphan sweep now that the cascade widened the removal set. */
	let snapshot = compute::installed_after_changes(&changes, ctx);
	for orphan in ctx.registry.find_removable_auto_installed(&snapshot, ctx.criteria) {
		log::debug!("{} is orphaned by the cascade", orphan.package.identifier);
		changes.insert(Operation::new(orphan.package, OperationKind::Remove, Reason::NoLongerUsed));
	}

	changes
}
