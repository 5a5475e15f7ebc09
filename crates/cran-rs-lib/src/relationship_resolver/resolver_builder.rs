use super::*;

#[derive(Debug, Clone)]
pub struct ResolverBuilder<'reg> {
	registry: &'reg Registry,
	requested: Vec<String>,
	builtins: BuiltInSet,
	excluded: ExclusionSet,
}

impl<'reg> ResolverBuilder<'reg> {
	/// Starts with [`R_INCLUDED`](crate::builtin::R_INCLUDED) as the built-in set and nothing excluded.
	pub fn new(registry: &'reg Registry) -> Self {
		Self {
			registry,
			requested: Default::default(),
			builtins: BuiltInSet::r_included(),
			excluded: Default::default(),
		}
	}

	pub fn add_package_requirements(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
		for name in names {
			let name = name.into();
			if !self.requested.contains(&name) {
				self.requested.push(name);
			}
		}
		self
	}

	pub fn exclude(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.excluded.extend(names.into_iter().map(Into::into));
		self
	}

	/// Replaces the built-in set.
	pub fn builtins(mut self, builtins: BuiltInSet) -> Self {
		self.builtins = builtins;
		self
	}

	pub fn build(self) -> Resolver<'reg> {
		Resolver::new(self.registry, self.requested, self.builtins, self.excluded)
	}
}
