//! Transitive dependency and conflict resolution.
//!
//! The change-set engine delegates the transitive install closure to an
//! implementation of [`RelationshipSolve`] and treats its output as
//! authoritative. [`TransitiveResolver`] is the built-in implementation.
//!
//! A solve never fails: unsatisfiable requests come back as a best-effort
//! [`Resolution`] carrying conflict data.

use std::collections::HashMap;

use crate::registry::RegistryView;
use crate::registry::package::{GameVersion, Package, PackageIdentifier};
use crate::changeset::Reason;

mod resolver;
pub use resolver::TransitiveResolver;

/// How strict a solve should be.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverOptions {
	/// Ambiguous `provides` pass through unresolved instead of stopping the solve.
	pub without_too_many_provides: bool,
	/// Keep going when requirements can't be met or the installed set is already broken.
	pub proceed_with_inconsistencies: bool,
	/// Don't require the final set to be fully consistent.
	pub without_enforce_consistency: bool,
	/// Pull in soft (recommended) dependencies as well.
	pub with_recommends: bool,
}

/// What the engine asks the solver to do.
#[derive(Debug, Clone, Default)]
pub struct SolveRequest {
	/// Packages to install, each with the reasons already attached to it.
	/// The solver accumulates further reasons on top of these.
	pub install: Vec<(Package, Vec<Reason>)>,
	/// Concrete releases leaving the installed set.
	pub remove: Vec<PackageIdentifier>,
}

/// The authoritative outcome of a solve.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
	install_list: Vec<Package>,
	reasons: HashMap<PackageIdentifier, Vec<Reason>>,
	conflicts: HashMap<PackageIdentifier, String>,
	conflict_descriptions: Vec<String>,
}

impl Resolution {
	/// The transitive install closure, in install order (dependencies first).
	pub fn resulting_install_list(&self) -> &[Package] {
		&self.install_list
	}

	/// Every reason the solver accumulated for `package`.
	pub fn reasons_for(&self, package: &PackageIdentifier) -> &[Reason] {
		self.reasons.get(package).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn conflict_list(&self) -> &HashMap<PackageIdentifier, String> {
		&self.conflicts
	}

	pub fn conflict_descriptions(&self) -> &[String] {
		&self.conflict_descriptions
	}
}

/// The solver seam the change-set engine is generic over.
pub trait RelationshipSolve<R: RegistryView> {
	/// Must return a best-effort [`Resolution`] even for unsatisfiable
	/// requests; an unsolvable graph is conflict data, not an error.
	fn resolve(&self, request: SolveRequest, options: SolverOptions, registry: &R, criteria: &[GameVersion]) -> Resolution;
}
