//! Breadth-first transitive resolver over the registry's relationship data.

use std::collections::{HashMap, HashSet, VecDeque};
use petgraph::prelude::*;

use crate::changeset::Reason;
use crate::registry::RegistryView;
use crate::registry::package::*;
use super::{RelationshipSolve, Resolution, SolveRequest, SolverOptions};

/// The built-in [`RelationshipSolve`] implementation.
///
/// Expands depends edges breadth-first from the requested packages, picking
/// the latest compatible release for every requirement. Requirements already
/// met by the post-change installed set are left alone; ambiguous `provides`
/// pass through unresolved under [`SolverOptions::without_too_many_provides`];
/// anything unsatisfiable becomes conflict data instead of a failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransitiveResolver;

impl<R: RegistryView> RelationshipSolve<R> for TransitiveResolver {
	fn resolve(&self, request: SolveRequest, options: SolverOptions, registry: &R, criteria: &[GameVersion]) -> Resolution {
		Solve::new(options, registry, criteria).run(request)
	}
}

struct Solve<'r, R: RegistryView> {
	registry: &'r R,
	criteria: &'r [GameVersion],
	options: SolverOptions,

	/// One node per identifier, edges dependency to dependent, so that a
	/// topological sort yields an install order with dependencies first.
	graph: DiGraph<String, ()>,
	nodes: HashMap<String, NodeIndex>,
	chosen: HashMap<String, Package>,
	reasons: HashMap<String, Vec<Reason>>,
	/* Discovery order; doubles as the install order fallback for cyclic graphs. */
	order: Vec<String>,
	queue: VecDeque<String>,

	/* What stays installed after the requested removals. */
	installed: Vec<&'r Package>,
	/* Hard requirements nothing could satisfy: (requiring package, wanted). */
	unresolved: Vec<(String, String)>,
	conflicts: HashMap<PackageIdentifier, String>,
	conflict_descriptions: Vec<String>,
}

impl<'r, R: RegistryView> Solve<'r, R> {
	fn new(options: SolverOptions, registry: &'r R, criteria: &'r [GameVersion]) -> Self {
		Solve {
			registry,
			criteria,
			options,
			graph: Default::default(),
			nodes: Default::default(),
			chosen: Default::default(),
			reasons: Default::default(),
			order: Default::default(),
			queue: Default::default(),
			installed: Default::default(),
			unresolved: Default::default(),
			conflicts: Default::default(),
			conflict_descriptions: Default::default(),
		}
	}

	fn run(mut self, request: SolveRequest) -> Resolution {
		let removing: HashSet<&str> = request.remove.iter()
			.map(|id| id.identifier.as_str())
			.collect();
		self.installed = self.registry.installed_packages().iter()
			.filter(|im| !removing.contains(im.identifier()))
			.map(|im| &im.package)
			.collect();

		if !self.options.proceed_with_inconsistencies {
			self.scan_installed_consistency();
		}

		for (package, reasons) in request.install {
			self.add_package(package, reasons);
		}
		while let Some(identifier) = self.queue.pop_front() {
			self.expand(&identifier);
		}

		self.detect_conflicts();

		if !self.options.without_enforce_consistency {
			for (source, wanted) in std::mem::take(&mut self.unresolved) {
				if let Some(package) = self.chosen.get(&source) {
					self.conflicts.insert(package.identifier.clone(), format!("missing dependency: {}", wanted));
				}
			}
		}

		/* Install order: dependencies before dependents. */
		let order: Vec<String> = match petgraph::algo::toposort(&self.graph, None) {
			Ok(nodes) => nodes.into_iter().map(|n| self.graph[n].clone()).collect(),
			Err(_) => {
				log::debug!("dependency cycle detected, falling back to discovery order");
				self.order.clone()
			}
		};

		Resolution {
			install_list: order.iter()
				.filter_map(|id| self.chosen.get(id).cloned())
				.collect(),
			reasons: self.reasons.iter()
				.filter_map(|(id, reasons)| self.chosen.get(id).map(|p| (p.identifier.clone(), reasons.clone())))
				.collect(),
			conflicts: self.conflicts,
			conflict_descriptions: self.conflict_descriptions,
		}
	}

	/// Adds `package` to the install closure, or merges reasons into the
	/// release already chosen for its identifier.
	fn add_package(&mut self, package: Package, reasons: Vec<Reason>) {
		let identifier = package.identifier.identifier.clone();

		if let Some(existing) = self.chosen.get(&identifier) {
			if existing.identifier.version != package.identifier.version {
				/* Keep the first choice, report the clash. */
				self.conflict_descriptions.push(format!(
					"{} is wanted at both {} and {}",
					identifier, existing.identifier.version, package.identifier.version,
				));
			}
			for reason in reasons {
				self.push_reason(&identifier, reason);
			}
			return;
		}

		log::trace!("adding {} to the install closure", package.identifier);
		let node = self.graph.add_node(identifier.clone());
		self.nodes.insert(identifier.clone(), node);
		self.order.push(identifier.clone());
		self.reasons.insert(identifier.clone(), Vec::new());
		for reason in reasons {
			self.push_reason(&identifier, reason);
		}
		self.chosen.insert(identifier.clone(), package);
		self.queue.push_back(identifier);
	}

	fn expand(&mut self, identifier: &str) {
		let package = self.chosen.get(identifier).cloned().expect("queued package should be chosen");
		for rel in &package.depends {
			self.satisfy(rel, identifier, true);
		}
		if self.options.with_recommends {
			for rel in &package.recommends {
				self.satisfy(rel, identifier, false);
			}
		}
	}

	/// Finds or installs something fulfilling `rel` for `source`. Soft
	/// requirements (`hard == false`) fail silently.
	fn satisfy(&mut self, rel: &Relationship, source: &str, hard: bool) {
		/* Already part of the closure? */
		for desc in rel.descriptors() {
			let found = self.order.iter()
				.find(|id| self.chosen.get(id.as_str()).map_or(false, |p| package_provides_descriptor(p, desc)))
				.cloned();
			if let Some(id) = found {
				self.push_reason(&id, Reason::DependencyOf(source.to_string()));
				self.link(&id, source);
				return;
			}
		}

		/* Already on disk and staying? */
		for desc in rel.descriptors() {
			if self.installed.iter().any(|p| package_provides_descriptor(p, desc)) {
				return;
			}
		}

		/* Pick a new package from the registry, first alternative that resolves. */
		for desc in rel.descriptors() {
			let providers = self.registry.packages_providing(desc, self.criteria);
			if providers.is_empty() {
				continue;
			}
			if providers.len() > 1 {
				if self.options.without_too_many_provides {
					log::debug!("multiple packages provide {}, leaving the choice unresolved", desc.name);
				} else if hard {
					self.unresolved.push((source.to_string(), desc.name.clone()));
					self.conflict_descriptions.push(format!("multiple packages provide {}, no choice was made", desc.name));
				}
				return;
			}

			let mut releases = providers.into_values().next().expect("one provider when len() == 1");
			releases.sort();
			let latest = (*releases.last().expect("a provider entry is never empty")).clone();
			let identifier = latest.identifier.identifier.clone();
			self.add_package(latest, vec![Reason::DependencyOf(source.to_string())]);
			self.link(&identifier, source);
			return;
		}

		/* Nothing can satisfy the relationship. */
		if hard {
			let wanted = rel.descriptors().map(|d| d.name.clone()).collect::<Vec<_>>().join(" or ");
			log::debug!("{} required by {} is unsatisfiable", wanted, source);
			self.unresolved.push((source.to_string(), wanted.clone()));
			self.conflict_descriptions.push(format!(
				"{} required by {} is not available for the current game version",
				wanted, source,
			));
		}
	}

	fn link(&mut self, dependency: &str, dependent: &str) {
		let (Some(&dep), Some(&src)) = (self.nodes.get(dependency), self.nodes.get(dependent)) else { return };
		self.graph.update_edge(dep, src, ());
	}

	fn push_reason(&mut self, identifier: &str, reason: Reason) {
		let reasons = self.reasons.entry(identifier.to_string()).or_default();
		if !reasons.contains(&reason) {
			reasons.push(reason);
		}
	}

	/// Conflicts between the closure and what stays installed, and within the
	/// closure itself. Both directions of a pair land in the conflict map.
	fn detect_conflicts(&mut self) {
		let mut clashes = Vec::<(PackageIdentifier, PackageIdentifier)>::new();
		for (i, id) in self.order.iter().enumerate() {
			let p = &self.chosen[id.as_str()];
			for q in &self.installed {
				if Package::packages_conflict(p, q) {
					clashes.push((p.identifier.clone(), q.identifier.clone()));
				}
			}
			for other in &self.order[i + 1..] {
				let q = &self.chosen[other.as_str()];
				if Package::packages_conflict(p, q) {
					clashes.push((p.identifier.clone(), q.identifier.clone()));
				}
			}
		}

		for (a, b) in clashes {
			log::debug!("{} conflicts with {}", a, b);
			self.conflicts.insert(a.clone(), format!("{} conflicts with {}", a, b));
			self.conflicts.insert(b.clone(), format!("{} conflicts with {}", b, a));
			self.conflict_descriptions.push(format!("{} conflicts with {}", a, b));
			self.push_reason(&a.identifier, Reason::ConflictsWith(b.identifier.clone()));
		}
	}

	/// Reports requirements of the already-installed set that are broken
	/// before this solve even starts.
	fn scan_installed_consistency(&mut self) {
		for p in &self.installed {
			for rel in &p.depends {
				let held = rel.descriptors()
					.any(|d| self.installed.iter().any(|q| package_provides_descriptor(q, d)));
				if !held {
					let wanted = rel.descriptors().map(|d| d.name.clone()).collect::<Vec<_>>().join(" or ");
					self.conflict_descriptions.push(format!(
						"installed package {} is missing {}",
						p.identifier, wanted,
					));
				}
			}
		}
	}
}
