use serde::{Serialize, Deserialize};
use super::*;

/// A unique identifier for a single package release.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PackageIdentifier {
	pub identifier: String,
	pub version: PackageVersion,
}

impl std::cmp::Ord for PackageIdentifier {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.identifier.cmp(&other.identifier) {
			std::cmp::Ordering::Equal => {}
			ord => return ord,
		}
		self.version.cmp(&other.version)
	}
}

impl std::cmp::PartialOrd for PackageIdentifier {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for PackageIdentifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.identifier, self.version)
	}
}

impl AsRef<PackageIdentifier> for PackageIdentifier {
	fn as_ref(&self) -> &PackageIdentifier {
		self
	}
}

/// Describes a range of packages using an identifier and version bounds.
///
/// Differs from [`PackageIdentifier`] in that it can match many releases and
/// can be satisfied through `provides`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDescriptor {
	pub name: String,
	#[serde(default)]
	pub version: PackageVersionBounds,
}

/// A requirement of a package that must be met for the package to be installed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Relationship {
	/// At least one of the descriptors must match to fulfill the relationship.
	AnyOf(Vec<PackageDescriptor>),
	/// This single descriptor must be met.
	One(PackageDescriptor),
}

impl Relationship {
	/// The descriptors that could fulfill this relationship, in declaration order.
	pub fn descriptors(&self) -> impl Iterator<Item = &PackageDescriptor> {
		match self {
			Relationship::AnyOf(v) => v.iter(),
			Relationship::One(d) => std::slice::from_ref(d).iter(),
		}
	}
}

pub fn package_fulfills_relationship(package: &Package, relationship: &Relationship) -> bool {
	relationship.descriptors().any(|desc| package_provides_descriptor(package, desc))
}

/// Identifier-and-version match, ignoring `provides`.
pub fn package_matches_descriptor(identifier: &PackageIdentifier, descriptor: &PackageDescriptor) -> bool {
	identifier.identifier == descriptor.name && descriptor.version.is_version_within(&identifier.version)
}

/// Like [`package_matches_descriptor`] but also satisfied through the
/// package's `provides` identifiers.
pub fn package_provides_descriptor(package: &Package, descriptor: &PackageDescriptor) -> bool {
	(package.identifier.identifier == descriptor.name || package.provides.contains(&descriptor.name))
		&& descriptor.version.is_version_within(&package.identifier.version)
}
