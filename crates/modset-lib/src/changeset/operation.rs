//! Operations, the reasons behind them, and the plan they combine into.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

use crate::registry::package::{Package, PackageIdentifier};

/// What an [`Operation`] does to its package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
	Install,
	Remove,
	Update,
	Replace,
}

/// Why a package ended up in the change set.
///
/// Reasons accumulate: a package wanted for several reasons carries all of
/// them, and merging operations must preserve every reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
	/// Directly requested by the user.
	ExplicitUser,
	/// Required by the named package.
	DependencyOf(String),
	/// A package this one depends on is being removed.
	DependencyRemoved,
	/// Auto-installed and nothing depends on it any more.
	NoLongerUsed,
	/// Incompatible with the named package.
	ConflictsWith(String),
	/// Install half of a replacement, naming the package it supersedes.
	Replaces(String),
	/// Remove half of a replacement, naming the successor.
	ReplacedBy(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
	pub package: Package,
	pub kind: OperationKind,
	pub reasons: Vec<Reason>,
}

impl Operation {
	pub fn new(package: Package, kind: OperationKind, reason: Reason) -> Self {
		Operation { package, kind, reasons: vec![reason] }
	}

	pub fn identifier(&self) -> &str {
		&self.package.identifier.identifier
	}

	/// Cascade identity: "the same package" by identifier only, any release.
	///
	/// Contrast with the `Eq` impl, which is plan identity
	/// (identifier + version + kind).
	pub fn covers_identifier(&self, identifier: &str) -> bool {
		self.identifier() == identifier
	}

	pub fn is_install(&self) -> bool {
		matches!(self.kind, OperationKind::Install)
	}

	pub fn is_remove(&self) -> bool {
		matches!(self.kind, OperationKind::Remove)
	}
}

/* Plan identity: package release + kind. Reasons don't participate, they are
 * merged instead (see ChangeSet::insert). */
impl PartialEq for Operation {
	fn eq(&self, other: &Self) -> bool {
		self.kind == other.kind && self.package.identifier == other.package.identifier
	}
}

impl Eq for Operation {}

impl std::hash::Hash for Operation {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.kind.hash(state);
		self.package.identifier.hash(state);
	}
}

/// An unordered accumulation of operations with merge-on-insert semantics:
/// inserting an operation equal to an existing one (same release, same kind)
/// unions the reasons instead of adding a second entry.
///
/// Ordering is only established later by [`resolve()`](super::resolve).
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
	ops: Vec<Operation>,
}

impl ChangeSet {
	pub fn insert(&mut self, op: Operation) {
		if let Some(existing) = self.ops.iter_mut().find(|o| **o == op) {
			for reason in op.reasons {
				if !existing.reasons.contains(&reason) {
					existing.reasons.push(reason);
				}
			}
		} else {
			self.ops.push(op);
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = &Operation> {
		self.ops.iter()
	}

	pub fn len(&self) -> usize {
		self.ops.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}
}

impl IntoIterator for ChangeSet {
	type Item = Operation;
	type IntoIter = std::vec::IntoIter<Operation>;
	fn into_iter(self) -> Self::IntoIter {
		self.ops.into_iter()
	}
}

impl FromIterator<Operation> for ChangeSet {
	fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
		let mut set = ChangeSet::default();
		for op in iter {
			set.insert(op);
		}
		set
	}
}

/// The final, ordered outcome of a resolution pass.
///
/// A package identifier appears at most once among the install-like
/// operations and at most once among the removes; appearing in both is a
/// deliberate replacement pairing, never a conflict.
#[derive(Debug, Clone, Default)]
pub struct Plan {
	/// Non-install operations sorted by identifier, then the solver's install
	/// list in install order.
	pub operations: Vec<Operation>,
	/// Conflicting package to human-readable summary, verbatim from the solver.
	pub conflicts: HashMap<PackageIdentifier, String>,
	pub conflict_descriptions: Vec<String>,
}

impl Plan {
	pub fn has_conflicts(&self) -> bool {
		!self.conflicts.is_empty() || !self.conflict_descriptions.is_empty()
	}

	/// The operations that add a package: Install and Update.
	pub fn installs(&self) -> impl Iterator<Item = &Operation> {
		self.operations.iter().filter(|op| !op.is_remove())
	}

	pub fn removes(&self) -> impl Iterator<Item = &Operation> {
		self.operations.iter().filter(|op| op.is_remove())
	}
}
