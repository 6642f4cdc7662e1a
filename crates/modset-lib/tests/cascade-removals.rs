//! Stage two of the engine: removals cascade through reverse dependencies.

use modset::Registry;
use modset::changeset::*;
use modset::registry::InstalledPackage;
use modset::registry::package::Package;
use modset_test_utils::{baseline_states, registry_with_installed, set_desired, version};

const PACKAGES: &str = r#"[
	{"identifier": {"identifier": "engine", "version": "1.0"}, "name": "Engine"},
	{"identifier": {"identifier": "engine", "version": "2.0"}, "name": "Engine"},
	{"identifier": {"identifier": "wings", "version": "1.0"}, "name": "Wings", "depends": [{"One": {"name": "engine"}}, {"One": {"name": "gauge"}}]},
	{"identifier": {"identifier": "wings", "version": "2.0"}, "name": "Wings", "depends": [{"One": {"name": "engine"}}, {"One": {"name": "gauge"}}]},
	{"identifier": {"identifier": "decals", "version": "1.0"}, "name": "Decals", "depends": [{"One": {"name": "wings"}}]},
	{"identifier": {"identifier": "gauge", "version": "1.0"}, "name": "Gauge"},
	{"identifier": {"identifier": "paint", "version": "1.0"}, "name": "Paint"}
]"#;

fn ctx(registry: &Registry) -> ResolutionContext<'_, Registry> {
	ResolutionContext { registry, criteria: &[] }
}

fn cascaded(registry: &Registry, states: &[PackageState]) -> ChangeSet {
	let ctx = ctx(registry);
	cascade(compute_user_changes(states, &ctx), &ctx)
}

fn find<'a>(changes: &'a ChangeSet, identifier: &str, kind: OperationKind) -> &'a Operation {
	changes.iter()
		.find(|op| op.identifier() == identifier && op.kind == kind)
		.unwrap_or_else(|| panic!("expected a {:?} of {}", kind, identifier))
}

#[test]
fn removal_cascades_to_transitive_dependents() {
	let registry = registry_with_installed(PACKAGES, &[
		("engine", "1.0", false),
		("gauge", "1.0", false),
		("wings", "1.0", false),
		("decals", "1.0", false),
	]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "engine", DesiredOperation::Remove);

	let changes = cascaded(&registry, &states);

	assert_eq!(changes.len(), 3);
	assert_eq!(find(&changes, "engine", OperationKind::Remove).reasons, vec![Reason::ExplicitUser]);
	assert_eq!(find(&changes, "wings", OperationKind::Remove).reasons, vec![Reason::DependencyRemoved]);
	assert_eq!(find(&changes, "decals", OperationKind::Remove).reasons, vec![Reason::DependencyRemoved]);
}

#[test]
fn cascaded_removals_orphan_auto_installed_packages() {
	let registry = registry_with_installed(PACKAGES, &[
		("engine", "1.0", false),
		("gauge", "1.0", true),
		("wings", "1.0", false),
		("paint", "1.0", false),
	]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "engine", DesiredOperation::Remove);

	let changes = cascaded(&registry, &states);

	/* wings leaves with the engine, and gauge was only there for wings. */
	assert_eq!(find(&changes, "gauge", OperationKind::Remove).reasons, vec![Reason::NoLongerUsed]);
	assert!(!changes.iter().any(|op| op.identifier() == "paint"));
}

#[test]
fn switching_releases_does_not_cascade_as_a_removal() {
	let registry = registry_with_installed(PACKAGES, &[
		("engine", "1.0", false),
		("gauge", "1.0", false),
		("wings", "1.0", false),
	]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "engine", DesiredOperation::Install { version: Some(version("2.0")) });

	let changes = cascaded(&registry, &states);

	/* The remove half of the release switch is not a departure. */
	assert_eq!(changes.len(), 2);
	assert!(!changes.iter().any(|op| op.identifier() == "wings"));
}

#[test]
fn dependents_scheduled_to_stay_are_not_cascaded() {
	let registry = registry_with_installed(PACKAGES, &[
		("engine", "1.0", false),
		("gauge", "1.0", false),
		("wings", "1.0", false),
	]);
	let mut states = baseline_states(&registry);
	set_desired(&mut states, "engine", DesiredOperation::Remove);
	set_desired(&mut states, "wings", DesiredOperation::Update { version: None });

	let changes = cascaded(&registry, &states);

	assert!(!changes.iter().any(|op| op.identifier() == "wings" && op.is_remove()));
	assert_eq!(find(&changes, "wings", OperationKind::Update).package.identifier.version, version("2.0"));
}

#[test]
fn cascade_falls_back_to_the_installed_record_when_the_registry_lacks_the_release() {
	let engine: Package = serde_json::from_str(
		r#"{"identifier": {"identifier": "engine", "version": "1.0"}, "name": "Engine"}"#,
	).expect("fixture package should parse");
	let wings: Package = serde_json::from_str(
		r#"{"identifier": {"identifier": "wings", "version": "0.9"}, "name": "Wings", "depends": [{"One": {"name": "engine"}}]}"#,
	).expect("fixture package should parse");

	/* wings 0.9 is installed but the registry no longer carries it. */
	let registry = Registry::new(
		[engine.clone()],
		[
			InstalledPackage { package: engine, auto_installed: false },
			InstalledPackage { package: wings, auto_installed: false },
		],
	).expect("fixture registry should validate");

	let mut states = baseline_states(&registry);
	set_desired(&mut states, "engine", DesiredOperation::Remove);

	let changes = cascaded(&registry, &states);

	assert_eq!(find(&changes, "wings", OperationKind::Remove).package.identifier.version, version("0.9"));
}
