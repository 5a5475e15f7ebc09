//! Transitive dependency closure.

use std::collections::BTreeSet;

use super::*;

/// Every package that has to be fetched to satisfy a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Closure {
	names: BTreeSet<String>,
}

impl Closure {
	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Names in ascending order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.names.iter().map(String::as_str)
	}

	pub fn into_names(self) -> BTreeSet<String> {
		self.names
	}

	/// Drops any built-in or excluded names.
	pub fn without(mut self, builtins: &BuiltInSet, excluded: &ExclusionSet) -> Self {
		self.names.retain(|name| !builtins.contains(name) && !excluded.contains(name));
		self
	}
}

impl<S: Into<String>> FromIterator<S> for Closure {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self { names: iter.into_iter().map(Into::into).collect() }
	}
}

/// Expands `requested` into the set of packages it needs.
///
/// The result holds each requested name plus every dependency reachable from it, without passing through
/// built-in or excluded names. Each package is expanded once, so cyclic dependencies terminate.
///
/// # Errors
/// [`UnknownPackage`](crate::Error::UnknownPackage) when a requested name or a reached dependency isn't in `registry`.
/// Requested names that are built in or excluded are skipped and never looked up.
pub fn resolve(requested: impl IntoIterator<Item = impl AsRef<str>>, registry: &Registry, builtins: &BuiltInSet, excluded: &ExclusionSet) -> crate::Result<Closure> {
	let is_boundary = |name: &str| builtins.contains(name) || excluded.contains(name);

	let mut names = BTreeSet::<String>::new();
	/* Names in here have been added to `names` but their dependencies not yet looked at */
	let mut pending = Vec::<&str>::new();

	for request in requested {
		let request = request.as_ref();
		if is_boundary(request) {
			log::info!("Skipping requested package {} as it is built in or excluded", request);
			continue;
		}
		let record = registry.get(request)?;
		if names.insert(record.name.clone()) {
			pending.push(&record.name);
		}
	}

	while let Some(name) = pending.pop() {
		let record = registry.get(name)?;
		for dependency in &record.dependencies {
			if is_boundary(dependency.as_str()) || names.contains(dependency) {
				continue;
			}
			let dependency = registry.get(dependency).map_err(|e| {
				log::error!("Package {} depends on {} which is not in the registry", name, dependency);
				e
			})?;
			log::trace!("{} requires {}", name, dependency.name);
			names.insert(dependency.name.clone());
			pending.push(&dependency.name);
		}
	}

	Ok(Closure { names })
}
