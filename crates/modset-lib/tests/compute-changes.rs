//! Stage one of the engine: explicit selections become raw operations.

use modset::Registry;
use modset::changeset::*;
use modset_test_utils::{baseline_states, registry_with_installed, set_desired, version};

const PACKAGES: &str = r#"[
	{"identifier": {"identifier": "alpha", "version": "1.0"}, "name": "Alpha"},
	{"identifier": {"identifier": "alpha", "version": "2.0"}, "name": "Alpha"},
	{"identifier": {"identifier": "consumer", "version": "1.0"}, "name": "Consumer", "depends": [{"One": {"name": "lib"}}]},
	{"identifier": {"identifier": "lib", "version": "1.0"}, "name": "Lib"}
]"#;

fn ctx(registry: &Registry) -> ResolutionContext<'_, Registry> {
	ResolutionContext { registry, criteria: &[] }
}

fn find<'a>(changes: &'a ChangeSet, identifier: &str, kind: OperationKind) -> &'a Operation {
	changes.iter()
		.find(|op| op.identifier() == identifier && op.kind == kind)
		.unwrap_or_else(|| panic!("expected a {:?} of {}", kind, identifier))
}

#[test]
fn installing_an_absent_package_targets_the_latest_release() {
	let registry = registry_with_installed(PACKAGES, &[]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Install { version: None });

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(changes.len(), 1);
	let op = find(&changes, "alpha", OperationKind::Install);
	assert_eq!(op.package.identifier.version, version("2.0"));
	assert_eq!(op.reasons, vec![Reason::ExplicitUser]);
}

#[test]
fn installing_with_an_explicit_version_targets_that_release() {
	let registry = registry_with_installed(PACKAGES, &[]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Install { version: Some(version("1.0")) });

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(find(&changes, "alpha", OperationKind::Install).package.identifier.version, version("1.0"));
}

#[test]
fn installing_the_release_already_installed_is_a_noop() {
	let registry = registry_with_installed(PACKAGES, &[("alpha", "1.0", false)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Install { version: Some(version("1.0")) });

	assert!(compute_user_changes(&states, &ctx(&registry)).is_empty());
}

#[test]
fn switching_releases_pairs_a_remove_with_an_install() {
	let registry = registry_with_installed(PACKAGES, &[("alpha", "1.0", false)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Install { version: Some(version("2.0")) });

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(changes.len(), 2);
	assert_eq!(find(&changes, "alpha", OperationKind::Remove).package.identifier.version, version("1.0"));
	assert_eq!(find(&changes, "alpha", OperationKind::Install).package.identifier.version, version("2.0"));
}

#[test]
fn removing_an_installed_package_emits_a_remove() {
	let registry = registry_with_installed(PACKAGES, &[("alpha", "1.0", false)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Remove);

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(changes.len(), 1);
	assert_eq!(find(&changes, "alpha", OperationKind::Remove).reasons, vec![Reason::ExplicitUser]);
}

#[test]
fn removing_a_package_that_is_not_installed_does_nothing() {
	let registry = registry_with_installed(PACKAGES, &[]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Remove);

	assert!(compute_user_changes(&states, &ctx(&registry)).is_empty());
}

#[test]
fn updating_targets_the_latest_release() {
	let registry = registry_with_installed(PACKAGES, &[("alpha", "1.0", false)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Update { version: None });

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(changes.len(), 1);
	assert_eq!(find(&changes, "alpha", OperationKind::Update).package.identifier.version, version("2.0"));
}

#[test]
fn updating_with_no_newer_release_does_nothing() {
	let registry = registry_with_installed(PACKAGES, &[("alpha", "2.0", false)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "alpha", DesiredOperation::Update { version: None });

	assert!(compute_user_changes(&states, &ctx(&registry)).is_empty());
}

#[test]
fn unknown_identifiers_are_excluded_from_install_consideration() {
	let registry = registry_with_installed(PACKAGES, &[]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "ghost", DesiredOperation::Install { version: None });

	assert!(compute_user_changes(&states, &ctx(&registry)).is_empty());
}

#[test]
fn autodetected_packages_never_produce_operations() {
	let registry = registry_with_installed(PACKAGES, &[]);
	let states = vec![PackageState {
		identifier: "alpha".to_string(),
		installed: None,
		autodetected: true,
		desired: DesiredOperation::Install { version: None },
	}];

	assert!(compute_user_changes(&states, &ctx(&registry)).is_empty());
}

#[test]
fn removal_orphans_an_auto_installed_dependency() {
	let registry = registry_with_installed(PACKAGES, &[("consumer", "1.0", false), ("lib", "1.0", true)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "consumer", DesiredOperation::Remove);

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(changes.len(), 2);
	assert_eq!(find(&changes, "lib", OperationKind::Remove).reasons, vec![Reason::NoLongerUsed]);
}

#[test]
fn explicit_and_orphan_removal_merge_into_one_operation() {
	let registry = registry_with_installed(PACKAGES, &[("consumer", "1.0", false), ("lib", "1.0", true)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "consumer", DesiredOperation::Remove);
	set_desired(&mut states, "lib", DesiredOperation::Remove);

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(changes.len(), 2);
	let lib = find(&changes, "lib", OperationKind::Remove);
	assert!(lib.reasons.contains(&Reason::ExplicitUser));
	assert!(lib.reasons.contains(&Reason::NoLongerUsed));
}

#[test]
fn manually_installed_packages_are_never_swept_as_orphans() {
	let registry = registry_with_installed(PACKAGES, &[("consumer", "1.0", false), ("lib", "1.0", false)]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "consumer", DesiredOperation::Remove);

	let changes = compute_user_changes(&states, &ctx(&registry));

	assert_eq!(changes.len(), 1);
	assert!(!changes.iter().any(|op| op.identifier() == "lib"));
}
