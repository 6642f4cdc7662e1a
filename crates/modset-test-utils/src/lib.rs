//! Shared fixtures for integration tests.
//!
//! Registries are described as JSON package arrays so tests read close to the
//! on-disk format; installed records are attached as (identifier, version,
//! auto_installed) tuples pointing at packages in that array.

use modset::{Registry, RegistryView};
use modset::changeset::{DesiredOperation, PackageState};
use modset::registry::package::PackageVersion;

/// Builds a registry from a JSON array of packages, marking the listed
/// releases as installed.
pub fn registry_with_installed(packages_json: &str, installed: &[(&str, &str, bool)]) -> Registry {
	let packages: serde_json::Value = serde_json::from_str(packages_json).expect("fixture packages should be valid JSON");
	let list = packages.as_array().expect("fixture packages should be a JSON array");

	let installed: Vec<serde_json::Value> = installed.iter()
		.map(|(identifier, version, auto_installed)| {
			let package = list.iter()
				.find(|p| p["identifier"]["identifier"] == *identifier && p["identifier"]["version"] == *version)
				.unwrap_or_else(|| panic!("no fixture package {} {}", identifier, version));
			serde_json::json!({ "package": package, "auto_installed": auto_installed })
		})
		.collect();

	let file = serde_json::json!({ "packages": packages, "installed": installed });
	Registry::from_json(&file.to_string()).expect("fixture registry should validate")
}

/// One state row per installed package, all with no desired operation.
pub fn baseline_states(registry: &Registry) -> Vec<PackageState> {
	registry.installed_packages().iter()
		.map(|im| PackageState {
			identifier: im.identifier().to_string(),
			installed: Some(im.clone()),
			autodetected: false,
			desired: DesiredOperation::None,
		})
		.collect()
}

/// Sets what the user wants done to `identifier`, adding a row for packages
/// that aren't installed yet.
pub fn set_desired(states: &mut Vec<PackageState>, identifier: &str, desired: DesiredOperation) {
	if let Some(state) = states.iter_mut().find(|s| s.identifier == identifier) {
		state.desired = desired;
	} else {
		states.push(PackageState {
			identifier: identifier.to_string(),
			installed: None,
			autodetected: false,
			desired,
		});
	}
}

pub fn version(s: &str) -> PackageVersion {
	PackageVersion::new(s).expect("fixture version should parse")
}
