//! # The package registry
//!
//! Every package listed in a repository's `PACKAGES` index, keyed by name.
//!
//! A registry is built once from a complete index document and is read-only afterwards,
//! it can be shared freely between threads.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

pub mod package;
pub use package::PackageRecord;

pub mod parser;

mod generation;
pub use generation::fetch_index;
pub use generation::decode_index;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
	/// Address of the index this registry was generated from, empty when built from memory.
	source: String,
	packages: HashMap<String, PackageRecord>,
}

impl Registry {
	/// Parses an index document.
	///
	/// See [`parser`] for the accepted format.
	pub fn from_index(document: &str) -> crate::Result<Self> {
		parser::IndexParser::new().parse(document)
	}

	/// Registry from already constructed records, later records replace earlier ones of the same name.
	pub fn from_records(records: impl IntoIterator<Item = PackageRecord>) -> Self {
		let mut registry = Self::default();
		for record in records {
			registry.insert(record);
		}
		registry
	}

	pub(crate) fn insert(&mut self, record: PackageRecord) {
		if let Some(previous) = self.packages.insert(record.name.clone(), record) {
			log::debug!("Package {} listed more than once, keeping the later entry", previous.name);
		}
	}

	pub(crate) fn set_source(&mut self, source: impl Into<String>) {
		self.source = source.into();
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	/// # Errors
	/// [`UnknownPackage`](crate::Error::UnknownPackage) when `name` has no entry.
	pub fn get(&self, name: &str) -> crate::Result<&PackageRecord> {
		self.packages.get(name).ok_or_else(|| crate::Error::UnknownPackage(name.to_string()))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.packages.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.packages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.packages.is_empty()
	}

	pub fn packages(&self) -> impl Iterator<Item = &PackageRecord> {
		self.packages.values()
	}
}
