//! The known-package index and installed-module records, plus the query
//! surface the change-set engine consumes.
//!
//! The engine only ever reads through [`RegistryView`]; it never mutates the
//! registry. Callers must not change the registry while a resolution pass is
//! running (single writer, many readers, owned by the caller).

use std::collections::{HashMap, HashSet};
use serde::Deserialize;

pub mod package;
use package::*;

/// A record of a package present in the current game instance.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct InstalledPackage {
	pub package: Package,
	/// Installed only to satisfy a dependency, never picked by the user.
	#[serde(default)]
	pub auto_installed: bool,
}

impl InstalledPackage {
	pub fn identifier(&self) -> &str {
		&self.package.identifier.identifier
	}
}

/// An installed package paired with the release that supersedes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
	pub to_replace: Package,
	pub replace_with: Package,
}

/// The queries the change-set engine needs from a package registry.
pub trait RegistryView {
	/// Latest release of `identifier` compatible with `criteria`.
	fn latest_compatible(&self, identifier: &str, criteria: &[GameVersion]) -> Option<&Package>;

	/// Exact release lookup.
	fn package_by_version(&self, identifier: &str, version: &PackageVersion) -> Option<&Package>;

	/// Every release satisfying `descriptor` under `criteria`, grouped by
	/// identifier. More than one key means the descriptor is ambiguous
	/// (several packages `provide` it).
	fn packages_providing(&self, descriptor: &PackageDescriptor, criteria: &[GameVersion]) -> HashMap<String, Vec<&Package>>;

	fn installed_packages(&self) -> &[InstalledPackage];

	fn installed_package(&self, identifier: &str) -> Option<&InstalledPackage>;

	/// Identifiers of installed packages that transitively lose a dependency
	/// when `removed_ids` go away, assuming the `installing` packages stay.
	fn find_reverse_dependencies(&self, removed_ids: &[String], installing: &[Package]) -> Vec<String>;

	/// Auto-installed members of `snapshot` that no explicitly installed
	/// member still reaches through depends edges.
	fn find_removable_auto_installed(&self, snapshot: &[InstalledPackage], criteria: &[GameVersion]) -> Vec<InstalledPackage>;

	/// The replacement for `package` under `criteria`, if its metadata
	/// declares a successor that is actually available.
	fn get_replacement(&self, package: &Package, criteria: &[GameVersion]) -> Option<Replacement>;
}

/// In-memory registry: every known release indexed by identifier, plus the
/// installed records for the current instance.
#[derive(Debug, Default, Clone)]
pub struct Registry {
	/* Releases per identifier, kept sorted oldest to newest. */
	packages: HashMap<String, Vec<Package>>,
	installed: Vec<InstalledPackage>,
}

impl Registry {
	pub fn new(
		packages: impl IntoIterator<Item = Package>,
		installed: impl IntoIterator<Item = InstalledPackage>,
	) -> crate::Result<Self> {
		let mut map = HashMap::<String, Vec<Package>>::new();
		for package in packages {
			let releases = map.entry(package.identifier.identifier.clone()).or_default();
			if releases.iter().any(|r| r.identifier == package.identifier) {
				return Err(crate::Error::Validation(format!("duplicate package {}", package.identifier)));
			}
			releases.push(package);
		}
		for releases in map.values_mut() {
			releases.sort();
		}

		let installed: Vec<InstalledPackage> = installed.into_iter().collect();
		let mut seen = HashSet::<&str>::new();
		for record in &installed {
			if !seen.insert(record.identifier()) {
				return Err(crate::Error::Validation(format!("{} is installed twice", record.identifier())));
			}
		}

		Ok(Registry { packages: map, installed })
	}

	pub fn from_json(json: &str) -> crate::Result<Self> {
		#[derive(Deserialize)]
		struct RegistryFile {
			packages: Vec<Package>,
			#[serde(default)]
			installed: Vec<InstalledPackage>,
		}

		let file: RegistryFile = serde_json::from_str(json)?;
		Self::new(file.packages, file.installed)
	}

	pub fn from_json_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		Self::from_json(&std::fs::read_to_string(path)?)
	}
}

impl RegistryView for Registry {
	fn latest_compatible(&self, identifier: &str, criteria: &[GameVersion]) -> Option<&Package> {
		self.packages.get(identifier)?
			.iter().rev()
			.find(|p| p.is_game_compatible(criteria))
	}

	fn package_by_version(&self, identifier: &str, version: &PackageVersion) -> Option<&Package> {
		self.packages.get(identifier)?
			.iter()
			.find(|p| &p.identifier.version == version)
	}

	fn packages_providing(&self, descriptor: &PackageDescriptor, criteria: &[GameVersion]) -> HashMap<String, Vec<&Package>> {
		let mut map = HashMap::<String, Vec<&Package>>::new();
		for releases in self.packages.values() {
			for package in releases {
				if package_provides_descriptor(package, descriptor) && package.is_game_compatible(criteria) {
					map.entry(package.identifier.identifier.clone()).or_default().push(package);
				}
			}
		}
		map
	}

	fn installed_packages(&self) -> &[InstalledPackage] {
		&self.installed
	}

	fn installed_package(&self, identifier: &str) -> Option<&InstalledPackage> {
		self.installed.iter().find(|im| im.identifier() == identifier)
	}

	fn find_reverse_dependencies(&self, removed_ids: &[String], installing: &[Package]) -> Vec<String> {
		let installing_ids: HashSet<&str> = installing.iter()
			.map(|p| p.identifier.identifier.as_str())
			.collect();

		/* The hypothetical set after the removal. */
		let mut remaining: Vec<&Package> = self.installed.iter()
			.filter(|im| !removed_ids.contains(&im.package.identifier.identifier))
			.map(|im| &im.package)
			.chain(installing.iter())
			.collect();
		let mut gone: Vec<&Package> = self.installed.iter()
			.filter(|im| removed_ids.contains(&im.package.identifier.identifier))
			.map(|im| &im.package)
			.collect();

		/* A relationship is broken by the removal when nothing remaining
		 * satisfies it but one of the leaving packages used to. This keeps
		 * pre-existing inconsistencies out of the result. */
		fn broken(rel: &Relationship, remaining: &[&Package], gone: &[&Package]) -> bool {
			!rel.descriptors().any(|d| remaining.iter().any(|q| package_provides_descriptor(q, d)))
				&& rel.descriptors().any(|d| gone.iter().any(|q| package_provides_descriptor(q, d)))
		}

		let mut dependents = Vec::<String>::new();
		loop {
			let broken_now: Vec<&Package> = remaining.iter()
				.filter(|p| !installing_ids.contains(p.identifier.identifier.as_str()))
				.filter(|p| p.depends.iter().any(|rel| broken(rel, &remaining, &gone)))
				.copied()
				.collect();
			if broken_now.is_empty() {
				break;
			}
			for p in broken_now {
				log::trace!("{} loses a dependency and becomes a reverse-dependency removal", p.identifier);
				remaining.retain(|q| q.identifier != p.identifier);
				gone.push(p);
				dependents.push(p.identifier.identifier.clone());
			}
		}

		dependents
	}

	fn find_removable_auto_installed(&self, snapshot: &[InstalledPackage], _criteria: &[GameVersion]) -> Vec<InstalledPackage> {
		/* Reachability from the explicitly installed packages through depends edges. */
		let mut needed: HashSet<String> = snapshot.iter()
			.filter(|im| !im.auto_installed)
			.map(|im| im.identifier().to_string())
			.collect();

		loop {
			let mut grew = false;
			for im in snapshot {
				if !needed.contains(im.identifier()) {
					continue;
				}
				for rel in &im.package.depends {
					for desc in rel.descriptors() {
						for provider in snapshot {
							if package_provides_descriptor(&provider.package, desc)
								&& needed.insert(provider.identifier().to_string())
							{
								grew = true;
							}
						}
					}
				}
			}
			if !grew {
				break;
			}
		}

		snapshot.iter()
			.filter(|im| im.auto_installed && !needed.contains(im.identifier()))
			.cloned()
			.collect()
	}

	fn get_replacement(&self, package: &Package, criteria: &[GameVersion]) -> Option<Replacement> {
		let desc = package.replaced_by.as_ref()?;
		let replace_with = self.packages.get(&desc.name)?
			.iter().rev()
			.find(|p| desc.version.is_version_within(&p.identifier.version) && p.is_game_compatible(criteria))?
			.clone();
		Some(Replacement { to_replace: package.clone(), replace_with })
	}
}
