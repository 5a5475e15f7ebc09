//! Packages shipped with R itself.
//!
//! These are never fetched, and the resolver does not look past them.

use std::collections::HashSet;

/// R base packages followed by the recommended packages bundled with every R install.
pub const R_INCLUDED: &[&str] = &[
	"R",
	"base",
	"compiler",
	"datasets",
	"graphics",
	"grDevices",
	"grid",
	"methods",
	"parallel",
	"splines",
	"stats",
	"stats4",
	"tcltk",
	"utils",
	"tools",
	/* recommended */
	"KernSmooth",
	"MASS",
	"Matrix",
	"boot",
	"class",
	"cluster",
	"codetools",
	"foreign",
	"lattice",
	"mgcv",
	"nlme",
	"nnet",
	"rpart",
	"spatial",
	"survival",
];

/// A fixed set of always available package names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltInSet {
	names: HashSet<String>,
}

impl BuiltInSet {
	/// A set with nothing built in, every name is resolved from the registry.
	pub fn empty() -> Self {
		Self::default()
	}

	/// [`R_INCLUDED`] plus any extra names from the config.
	pub fn from_config(config: &crate::Config) -> Self {
		Self::r_included().with_names(config.extra_builtins().iter().cloned())
	}

	pub fn r_included() -> Self {
		Self::from_iter(R_INCLUDED.iter().copied())
	}

	pub fn with_names(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.names.extend(names.into_iter().map(Into::into));
		self
	}

	pub fn contains(&self, name: &str) -> bool {
		self.names.contains(name)
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.names.iter().map(String::as_str)
	}
}

impl<S: Into<String>> FromIterator<S> for BuiltInSet {
	fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
		Self { names: iter.into_iter().map(Into::into).collect() }
	}
}
