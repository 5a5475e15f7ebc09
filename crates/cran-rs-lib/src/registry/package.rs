//! A single entry of the registry.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

/// One package as listed in the index.
///
/// `dependencies` merges `Depends`, `Imports` and `LinkingTo`, which of them a name came from is not kept.
/// Version constraints on dependencies are dropped, only presence matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
	pub name: String,
	pub version: String,
	pub dependencies: BTreeSet<String>,
}

impl PackageRecord {
	/// A `name` listed in its own `dependencies` is dropped.
	pub fn new(name: impl Into<String>, version: impl Into<String>, dependencies: impl IntoIterator<Item = impl Into<String>>) -> Self {
		let name = name.into();
		let mut dependencies: BTreeSet<String> = dependencies.into_iter().map(Into::into).collect();
		dependencies.remove(&name);
		Self {
			name,
			version: version.into(),
			dependencies,
		}
	}
}

impl std::fmt::Display for PackageRecord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}-{}", self.name, self.version)
	}
}

impl AsRef<PackageRecord> for PackageRecord {
	fn as_ref(&self) -> &PackageRecord {
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn self_dependency_is_dropped() {
		let record = PackageRecord::new("Rcpp", "1.0.3", ["Rcpp", "methods", "utils"]);
		assert_eq!(record.dependencies.len(), 2);
		assert!(!record.dependencies.contains("Rcpp"));
	}
}
