//! The dependency edges between the members of a closure.

use std::collections::HashMap;

use petgraph::prelude::*;

use super::*;

/// Directed graph over the packages of a [`Closure`], edges point from a package to its dependencies.
///
/// Only dependencies that are themselves members of the closure become edges,
/// anything else is assumed to already be satisfied.
#[derive(Debug, Clone)]
pub struct DependencyGraph<'reg> {
	graph: DiGraph<&'reg str, ()>,
	nodes: HashMap<&'reg str, NodeIndex>,
}

impl<'reg> DependencyGraph<'reg> {
	/// # Errors
	/// [`UnknownPackage`](crate::Error::UnknownPackage) when a member of `closure` isn't in `registry`.
	pub fn build(closure: &Closure, registry: &'reg Registry, builtins: &BuiltInSet, excluded: &ExclusionSet) -> crate::Result<Self> {
		let mut graph = DiGraph::<&'reg str, ()>::with_capacity(closure.len(), 0);
		let mut nodes = HashMap::<&'reg str, NodeIndex>::with_capacity(closure.len());
		let mut records = Vec::with_capacity(closure.len());

		/* Nodes go in by name so the graph, and every walk over it, is the same for the same input */
		for name in closure.iter() {
			if builtins.contains(name) || excluded.contains(name) {
				continue;
			}
			let record = registry.get(name)?;
			nodes.insert(record.name.as_str(), graph.add_node(record.name.as_str()));
			records.push(record);
		}

		for record in records {
			let src = nodes[record.name.as_str()];
			for dependency in &record.dependencies {
				if dependency == &record.name {
					continue;
				}
				if let Some(&target) = nodes.get(dependency.as_str()) {
					graph.add_edge(src, target, ());
				}
			}
		}

		Ok(Self { graph, nodes })
	}

	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	pub fn edge_count(&self) -> usize {
		self.graph.edge_count()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.nodes.contains_key(name)
	}

	/// Direct in-graph dependencies of `name`, empty when `name` isn't a node.
	pub fn dependencies_of(&self, name: &str) -> Vec<&'reg str> {
		let mut v: Vec<_> = self.nodes.get(name)
			.map(|&i| self.graph.neighbors_directed(i, Outgoing).map(|n| self.graph[n]).collect())
			.unwrap_or_default();
		v.sort_unstable();
		v
	}

	/// Strongly connected components, dependencies before dependents.
	///
	/// A component with more than one member is a dependency cycle. Members of a component are sorted by name.
	pub fn components(&self) -> Vec<Vec<&'reg str>> {
		/* tarjan_scc yields components in reverse topological order, with edges pointing at dependencies that is install order */
		petgraph::algo::tarjan_scc(&self.graph)
			.into_iter()
			.map(|component| {
				let mut names: Vec<_> = component.into_iter().map(|i| self.graph[i]).collect();
				names.sort_unstable();
				names
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::PackageRecord;

	fn registry(packages: &[(&str, &[&str])]) -> Registry {
		Registry::from_records(packages.iter().map(|(name, deps)| PackageRecord::new(*name, "1.0", deps.iter().copied())))
	}

	#[test]
	fn edges_stay_inside_the_closure() {
		let r = registry(&[("A", &["B", "C", "stats"]), ("B", &["C"]), ("C", &[]), ("D", &[])]);
		let closure: Closure = ["A", "B"].into_iter().collect();
		let graph = DependencyGraph::build(&closure, &r, &BuiltInSet::r_included(), &ExclusionSet::new()).unwrap();
		assert_eq!(graph.node_count(), 2);
		assert_eq!(graph.edge_count(), 1);
		assert_eq!(graph.dependencies_of("A"), vec!["B"]);
		assert!(graph.dependencies_of("B").is_empty());
		assert!(!graph.contains("C"));
	}

	#[test]
	fn excluded_members_are_not_nodes() {
		let r = registry(&[("A", &["B"]), ("B", &[])]);
		let closure: Closure = ["A", "B"].into_iter().collect();
		let excluded: ExclusionSet = ["B".to_string()].into_iter().collect();
		let graph = DependencyGraph::build(&closure, &r, &BuiltInSet::empty(), &excluded).unwrap();
		assert_eq!(graph.node_count(), 1);
		assert_eq!(graph.edge_count(), 0);
	}

	#[test]
	fn cycle_forms_one_component() {
		let r = registry(&[("A", &["B"]), ("B", &["A", "C"]), ("C", &[])]);
		let closure: Closure = ["A", "B", "C"].into_iter().collect();
		let graph = DependencyGraph::build(&closure, &r, &BuiltInSet::empty(), &ExclusionSet::new()).unwrap();
		assert_eq!(graph.components(), vec![vec!["C"], vec!["A", "B"]]);
	}

	#[test]
	fn unknown_member_is_an_error() {
		let r = registry(&[("A", &[])]);
		let closure: Closure = ["A", "Ghost"].into_iter().collect();
		assert!(matches!(
			DependencyGraph::build(&closure, &r, &BuiltInSet::empty(), &ExclusionSet::new()),
			Err(crate::Error::UnknownPackage(_))
		));
	}
}
