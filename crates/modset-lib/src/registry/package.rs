//! Various types associated with packages.

use std::collections::HashSet;
use serde::{Serialize, Deserialize};

/// A single release of a mod known to the registry.
///
/// Identity is identifier + version; two releases of the same mod are
/// different `Package`s. Everything the change-set engine needs lives in the
/// relationship fields, presentation metadata stays out of this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
	pub identifier: PackageIdentifier,
	pub name: String,

	#[serde(default)]
	pub kind: Kind,
	/// Game versions this release claims to work with.
	#[serde(default)]
	pub game_versions: GameVersionBounds,

	#[serde(default)]
	pub depends: Vec<Relationship>,
	/// Soft dependencies, only pulled in when the solver is asked to.
	#[serde(default)]
	pub recommends: Vec<Relationship>,
	#[serde(default)]
	pub conflicts: Vec<Relationship>,
	/// Alternative identifiers this release satisfies.
	#[serde(default)]
	pub provides: HashSet<String>,
	/// The package that supersedes this one, if any.
	#[serde(default)]
	pub replaced_by: Option<PackageDescriptor>,
}

impl std::hash::Hash for Package {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.identifier.hash(state);
	}
}

impl std::cmp::PartialEq for Package {
	fn eq(&self, other: &Self) -> bool {
		self.identifier == other.identifier
	}
}

impl std::cmp::Eq for Package {}

impl std::cmp::Ord for Package {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.identifier.cmp(&other.identifier)
	}
}

impl std::cmp::PartialOrd for Package {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl AsRef<PackageIdentifier> for Package {
	fn as_ref(&self) -> &PackageIdentifier {
		&self.identifier
	}
}

impl Package {
	/// Checks if the given packages conflict with each other, in either direction.
	pub fn packages_conflict(lhs: &Self, rhs: &Self) -> bool {
		lhs.conflicts.iter().any(|con| relationship::package_fulfills_relationship(rhs, con))
			|| rhs.conflicts.iter().any(|con| relationship::package_fulfills_relationship(lhs, con))
	}

	/// Whether this release works with any of the given game versions.
	///
	/// Empty criteria means no filtering is active.
	pub fn is_game_compatible(&self, criteria: &[GameVersion]) -> bool {
		criteria.is_empty() || criteria.iter().any(|v| self.game_versions.is_version_compatible(v))
	}

	pub fn is_metapackage(&self) -> bool {
		matches!(self.kind, Kind::MetaPackage)
	}
}

/// The type of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
	/// A normal installable mod.
	#[default] Package,
	/// A grouping of relationships with no content of its own. Never installed directly.
	MetaPackage,
}

mod version_bounds;
pub use version_bounds::VersionBounds;

mod package_version;
pub use package_version::PackageVersion;
pub use package_version::PackageVersionBounds;

mod game_version;
pub use game_version::GameVersion;
pub use game_version::GameVersionBounds;

mod relationship;
pub use relationship::PackageIdentifier;
pub use relationship::PackageDescriptor;
pub use relationship::Relationship;
pub use relationship::package_fulfills_relationship;
pub use relationship::package_provides_descriptor;
pub use relationship::package_matches_descriptor;
