//! Orders a closure so every package comes after the packages it depends on.

use serde::{Serialize, Deserialize};

use super::*;

/// The sequence packages should be installed in.
///
/// Dependencies come before their dependents, except between members of a dependency cycle.
/// Cycles can't be ordered so their members are placed together, sorted by name, and listed in [`InstallOrder::cycles()`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallOrder {
	sequence: Vec<String>,
	cycles: Vec<Vec<String>>,
}

impl InstallOrder {
	pub fn sequence(&self) -> &[String] {
		&self.sequence
	}

	pub fn into_sequence(self) -> Vec<String> {
		self.sequence
	}

	/// Groups of packages that depend on each other.
	pub fn cycles(&self) -> &[Vec<String>] {
		&self.cycles
	}

	pub fn len(&self) -> usize {
		self.sequence.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sequence.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.sequence.iter().map(String::as_str)
	}
}

/// Topologically sorts `closure`, dependencies first.
///
/// A cycle is not an error, see [`InstallOrder`]. Every non built-in, non excluded member of `closure` appears exactly once.
///
/// # Errors
/// [`UnknownPackage`](crate::Error::UnknownPackage) when a member of `closure` isn't in `registry`.
pub fn order(closure: &Closure, registry: &Registry, builtins: &BuiltInSet, excluded: &ExclusionSet) -> crate::Result<InstallOrder> {
	let graph = DependencyGraph::build(closure, registry, builtins, excluded)?;

	let mut sequence = Vec::<String>::with_capacity(graph.node_count());
	let mut cycles = Vec::<Vec<String>>::new();

	for component in graph.components() {
		if component.len() > 1 {
			log::warn!("Dependency cycle between {}, their relative order is arbitrary", component.join(", "));
			cycles.push(component.iter().map(|s| s.to_string()).collect());
		}
		sequence.extend(component.into_iter().map(str::to_string));
	}

	let is_boundary = |name: &String| builtins.contains(name) || excluded.contains(name);
	sequence.retain(|name| !is_boundary(name));
	for cycle in &mut cycles {
		cycle.retain(|name| !is_boundary(name));
	}
	cycles.retain(|cycle| cycle.len() > 1);

	Ok(InstallOrder { sequence, cycles })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::PackageRecord;

	fn registry(packages: &[(&str, &[&str])]) -> Registry {
		Registry::from_records(packages.iter().map(|(name, deps)| PackageRecord::new(*name, "1.0", deps.iter().copied())))
	}

	fn resolve_and_order(r: &Registry, requested: &[&str], excluded: &[&str]) -> InstallOrder {
		let excluded: ExclusionSet = excluded.iter().map(|s| s.to_string()).collect();
		let closure = resolve(requested, r, &BuiltInSet::empty(), &excluded).unwrap();
		order(&closure, r, &BuiltInSet::empty(), &excluded).unwrap()
	}

	/// Asserts every in-order dependency of each package appears earlier in the sequence.
	fn assert_dependencies_first(r: &Registry, order: &InstallOrder) {
		let position = |name: &str| order.iter().position(|n| n == name);
		for (i, name) in order.iter().enumerate() {
			for dependency in &r.get(name).unwrap().dependencies {
				if let Some(j) = position(dependency.as_str()) {
					assert!(j < i, "{} must come before {} in {:?}", dependency, name, order.sequence());
				}
			}
		}
	}

	#[test]
	fn chain_orders_dependencies_first() {
		let r = registry(&[("X", &["Y"]), ("Y", &["Z"]), ("Z", &[])]);
		let order = resolve_and_order(&r, &["X"], &[]);
		assert_eq!(order.sequence(), ["Z", "Y", "X"]);
		assert!(order.cycles().is_empty());
	}

	#[test]
	fn excluded_subtree_orders_alone() {
		let r = registry(&[("X", &["Y"]), ("Y", &["Z"]), ("Z", &[])]);
		let order = resolve_and_order(&r, &["X"], &["Y"]);
		assert_eq!(order.sequence(), ["X"]);
	}

	#[test]
	fn diamond_is_ordered() {
		let r = registry(&[("top", &["left", "right"]), ("left", &["bottom"]), ("right", &["bottom", "left"]), ("bottom", &[])]);
		let order = resolve_and_order(&r, &["top"], &[]);
		assert_eq!(order.sequence(), ["bottom", "left", "right", "top"]);
		assert_dependencies_first(&r, &order);
	}

	#[test]
	fn two_cycle_is_a_total_order() {
		let r = registry(&[("A", &["B"]), ("B", &["A"])]);
		let order = resolve_and_order(&r, &["A"], &[]);
		assert_eq!(order.len(), 2);
		assert_eq!(order.iter().filter(|n| *n == "A").count(), 1);
		assert_eq!(order.iter().filter(|n| *n == "B").count(), 1);
		assert_eq!(order.cycles(), [vec!["A".to_string(), "B".to_string()]]);
	}

	#[test]
	fn cycle_still_follows_outside_dependencies() {
		let r = registry(&[("app", &["A"]), ("A", &["B", "base"]), ("B", &["A", "C"]), ("C", &[])]);
		let excluded = ExclusionSet::new();
		let closure = resolve(["app"], &r, &BuiltInSet::r_included(), &excluded).unwrap();
		let order = order(&closure, &r, &BuiltInSet::r_included(), &excluded).unwrap();
		assert_eq!(order.sequence(), ["C", "A", "B", "app"]);
	}

	#[test]
	fn independent_packages_are_deterministic() {
		let r = registry(&[("b", &[]), ("a", &[]), ("c", &["a"])]);
		let first = resolve_and_order(&r, &["c", "b"], &[]);
		let second = resolve_and_order(&r, &["b", "c"], &[]);
		assert_eq!(first, second);
		assert_dependencies_first(&r, &first);
	}

	#[test]
	fn filters_are_reapplied_to_the_output() {
		/* A closure built by hand may still carry boundary names */
		let r = registry(&[("A", &["B"]), ("B", &[])]);
		let closure: Closure = ["A", "B", "utils"].into_iter().collect();
		let excluded: ExclusionSet = ["B".to_string()].into_iter().collect();
		let order = order(&closure, &r, &BuiltInSet::r_included(), &excluded).unwrap();
		assert_eq!(order.sequence(), ["A"]);
	}

	#[test]
	fn filters_are_reapplied_to_cycles() {
		let r = registry(&[("A", &["B", "X"]), ("B", &["A"]), ("X", &["A"])]);
		let closure: Closure = ["A", "B", "X"].into_iter().collect();

		let excluded: ExclusionSet = ["X".to_string()].into_iter().collect();
		let order = order(&closure, &r, &BuiltInSet::empty(), &excluded).unwrap();
		assert_eq!(order.cycles(), [vec!["A".to_string(), "B".to_string()]]);

		/* Only one member left, no longer a cycle */
		let excluded: ExclusionSet = ["B".to_string()].into_iter().collect();
		let closure: Closure = ["A", "B"].into_iter().collect();
		let r = registry(&[("A", &["B"]), ("B", &["A"])]);
		let order = super::order(&closure, &r, &BuiltInSet::empty(), &excluded).unwrap();
		assert_eq!(order.sequence(), ["A"]);
		assert!(order.cycles().is_empty());
	}

	#[test]
	fn larger_graph_respects_every_edge() {
		let r = registry(&[
			("ggplot2", &["digest", "gtable", "scales", "rlang", "tibble"]),
			("scales", &["farver", "labeling", "R6", "RColorBrewer", "rlang", "viridisLite"]),
			("tibble", &["cli", "crayon", "fansi", "pillar", "rlang"]),
			("pillar", &["cli", "crayon", "fansi", "rlang", "utf8", "vctrs"]),
			("vctrs", &["digest", "ellipsis", "glue", "rlang", "zeallot"]),
			("ellipsis", &["rlang"]),
			("cli", &["assertthat", "crayon", "glue"]),
			("digest", &[]), ("gtable", &[]), ("rlang", &[]), ("farver", &[]), ("labeling", &[]), ("R6", &[]),
			("RColorBrewer", &[]), ("viridisLite", &[]), ("crayon", &[]), ("fansi", &[]), ("utf8", &[]),
			("glue", &[]), ("zeallot", &[]), ("assertthat", &[]),
		]);
		let order = resolve_and_order(&r, &["ggplot2"], &[]);
		assert_eq!(order.len(), r.len());
		assert_dependencies_first(&r, &order);
	}
}
