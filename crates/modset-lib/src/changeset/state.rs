//! Immutable per-package snapshot of what the user asked for.

use serde::{Serialize, Deserialize};

use crate::registry::InstalledPackage;
use crate::registry::package::PackageVersion;

/// What the user wants done to a single package. At most one is active per
/// package per resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DesiredOperation {
	/// Leave the package as it is.
	#[default] None,
	/// Install the package; `None` version means the latest compatible release.
	Install { version: Option<PackageVersion> },
	Remove,
	/// Upgrade an installed package; `None` version means the latest compatible release.
	Update { version: Option<PackageVersion> },
	/// Swap an installed package for its declared successor.
	///
	/// The target is always resolved through
	/// [`RegistryView::get_replacement`](crate::registry::RegistryView::get_replacement);
	/// the state carries none.
	Replace,
}

/// Snapshot of one package row as handed to the engine.
///
/// Owned by the caller's view model. The engine only reads it and emits
/// [`Operation`](super::Operation)s; applying them is the caller's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageState {
	pub identifier: String,
	pub installed: Option<InstalledPackage>,
	/// Detected on disk with no registry entry. Never eligible for any operation.
	#[serde(default)]
	pub autodetected: bool,
	#[serde(default)]
	pub desired: DesiredOperation,
}
