//! The result of a successful resolve.

use super::*;

#[derive(Debug)]
pub struct ResolverFinalized<'reg> {
	registry: &'reg Registry,
	closure: Closure,
	builtins: BuiltInSet,
	excluded: ExclusionSet,
}

impl<'reg> ResolverFinalized<'reg> {
	pub(super) fn new(registry: &'reg Registry, closure: Closure, builtins: BuiltInSet, excluded: ExclusionSet) -> Self {
		Self {
			registry,
			closure,
			builtins,
			excluded,
		}
	}

	/// Every package that needs fetching, built-in and excluded names already removed.
	pub fn closure(&self) -> &Closure {
		&self.closure
	}

	pub fn into_closure(self) -> Closure {
		self.closure
	}

	/// The closure sorted so that dependencies come first.
	pub fn install_order(&self) -> crate::Result<InstallOrder> {
		order(&self.closure, self.registry, &self.builtins, &self.excluded)
	}
}
