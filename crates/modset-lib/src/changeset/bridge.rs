//! Solver hand-off and the merge into the final plan.

use std::collections::HashSet;

use crate::registry::RegistryView;
use crate::registry::package::{Package, PackageIdentifier};
use crate::relationship_resolver::{RelationshipSolve, SolveRequest, SolverOptions};
use super::{ChangeSet, Operation, OperationKind, Plan, Reason, ResolutionContext};

/// The fixed best-effort policy for GUI-driven planning: offer the user a
/// plan even over a partially broken registry and defer hard failures to
/// install time.
const PLANNING_OPTIONS: SolverOptions = SolverOptions {
	without_too_many_provides: true,
	proceed_with_inconsistencies: true,
	without_enforce_consistency: true,
	with_recommends: false,
};

/// Delegate the transitive install set to `solver` and merge its output with
/// the cascaded operations into one ordered [`Plan`].
///
/// An unsatisfiable graph is a normal, reportable outcome: the plan comes
/// back with conflict data, never an error.
pub fn resolve<R, S>(cascaded: ChangeSet, solver: &S, ctx: &ResolutionContext<'_, R>) -> Plan
where
	R: RegistryView,
	S: RelationshipSolve<R>,
{
	/* Everything that is not an Install stays in the plan as-is; installs are
	 * replaced wholesale by the solver's list so every reason it discovers
	 * survives. */
	let mut kept = Vec::<Operation>::new();
	let mut to_install = Vec::<(Package, Vec<Reason>)>::new();
	let mut to_remove = Vec::<PackageIdentifier>::new();
	let mut upgrading = HashSet::<String>::new();

	for op in cascaded {
		match op.kind {
			OperationKind::Install => to_install.push((op.package, op.reasons)),
			OperationKind::Update => {
				upgrading.insert(op.identifier().to_string());
				to_install.push((op.package.clone(), op.reasons.clone()));
				kept.push(op);
			}
			OperationKind::Remove => {
				to_remove.push(op.package.identifier.clone());
				kept.push(op);
			}
			OperationKind::Replace => {
				/* Expanded into a linked Remove + Install pair; no Replace
				 * operation reaches the plan. A package whose replacement
				 * vanished from the registry is skipped. */
				let Some(repl) = ctx.registry.get_replacement(&op.package, ctx.criteria) else { continue };

				let mut remove_reasons = op.reasons.clone();
				remove_reasons.push(Reason::ReplacedBy(repl.replace_with.identifier.identifier.clone()));
				let mut install_reasons = op.reasons;
				install_reasons.push(Reason::Replaces(repl.to_replace.identifier.identifier.clone()));

				to_remove.push(repl.to_replace.identifier.clone());
				kept.push(Operation { package: repl.to_replace, kind: OperationKind::Remove, reasons: remove_reasons });
				to_install.push((repl.replace_with, install_reasons));
			}
		}
	}

	log::debug!("handing {} installs and {} removals to the solver", to_install.len(), to_remove.len());
	let resolution = solver.resolve(
		SolveRequest { install: to_install, remove: to_remove },
		PLANNING_OPTIONS,
		ctx.registry,
		ctx.criteria,
	);

	/* Non-install operations first, sorted by identifier, then the solver's
	 * install list in its own order. */
	kept.sort_by(|a, b| a.identifier().cmp(b.identifier()));

	let mut operations = kept;
	for package in resolution.resulting_install_list() {
		/* The Update entry already represents this installation. */
		if upgrading.contains(&package.identifier.identifier) {
			continue;
		}
		/* Metapackages are never installed directly. */
		if package.is_metapackage() {
			continue;
		}
		operations.push(Operation {
			package: package.clone(),
			kind: OperationKind::Install,
			reasons: resolution.reasons_for(&package.identifier).to_vec(),
		});
	}

	Plan {
		operations,
		conflicts: resolution.conflict_list().clone(),
		conflict_descriptions: resolution.conflict_descriptions().to_vec(),
	}
}
