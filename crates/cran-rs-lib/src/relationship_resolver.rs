//! Utilities for getting the complete, ordered list of packages to fetch from a list of desired packages.
//!
//! # Usage
//! 1. Create a [`ResolverBuilder`] over a [`Registry`].
//! 1. Use the builder to add requested packages, exclusions and the built-in set.
//! 1. [`ResolverBuilder::build()`] to get a [`Resolver`].
//! 1. [`Resolver::resolve()`] to get a [`ResolverFinalized`] holding the [`Closure`].
//! 1. [`ResolverFinalized::install_order()`] to list the packages dependencies first.
//!
//! [`resolve()`] and [`order()`] are the same two steps as plain functions.
//!
//! # Boundaries
//! Built-in and excluded names are never added to a closure and their own dependencies are never looked at.
//! They are filtered from the request, from every dependency reached, and again from the final order.

use std::collections::HashSet;

use crate::builtin::BuiltInSet;
use crate::registry::Registry;

mod closure;
pub use closure::Closure;
pub use closure::resolve;

mod dependency_graph;
pub use dependency_graph::DependencyGraph;

mod install_order;
pub use install_order::InstallOrder;
pub use install_order::order;

mod resolver_builder;
pub use resolver_builder::ResolverBuilder;
mod finalized_resolver;
pub use finalized_resolver::ResolverFinalized;

/// Names the user asked to leave out of the resolve entirely.
pub type ExclusionSet = HashSet<String>;

/// A configured resolve, ready to run.
#[derive(Debug, Clone)]
pub struct Resolver<'reg> {
	registry: &'reg Registry,
	requested: Vec<String>,
	builtins: BuiltInSet,
	excluded: ExclusionSet,
}

impl<'reg> Resolver<'reg> {
	pub(super) fn new(registry: &'reg Registry, requested: Vec<String>, builtins: BuiltInSet, excluded: ExclusionSet) -> Self {
		Self {
			registry,
			requested,
			builtins,
			excluded,
		}
	}

	pub fn requested(&self) -> &[String] {
		&self.requested
	}

	/// Computes the closure of the requested packages.
	///
	/// # Errors
	/// [`UnknownPackage`](crate::Error::UnknownPackage) naming the first requested or required package missing from the registry.
	pub fn resolve(self) -> crate::Result<ResolverFinalized<'reg>> {
		log::debug!("Resolving {} requested packages with {} exclusions", self.requested.len(), self.excluded.len());
		let closure = resolve(&self.requested, self.registry, &self.builtins, &self.excluded)?
			.without(&self.builtins, &self.excluded);
		log::info!("Resolved {} packages to fetch", closure.len());
		Ok(ResolverFinalized::new(self.registry, closure, self.builtins, self.excluded))
	}
}
