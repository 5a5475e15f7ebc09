//! What to fetch, from where, and what to call it.

use serde::{Serialize, Deserialize};

use crate::registry::Registry;
use crate::relationship_resolver::InstallOrder;
use crate::retrieval::locator::{ArchiveLocator, sequenced_file_name};

/// A single archive to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchEntry {
	/// Index in the install order, starting at zero.
	pub position: usize,
	pub name: String,
	pub version: String,
	pub url: String,
	/// Local file name, prefixed with `position`.
	pub file_name: String,
}

/// The install order with an address and local file name for every package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchPlan {
	entries: Vec<FetchEntry>,
}

impl FetchPlan {
	/// # Errors
	/// [`UnknownPackage`](crate::Error::UnknownPackage) when any package in `order` can't be located.
	/// A plan is never built with gaps.
	pub fn new(order: &InstallOrder, registry: &Registry, locator: &ArchiveLocator) -> crate::Result<Self> {
		let mut entries = Vec::<FetchEntry>::with_capacity(order.len());
		for (position, name) in order.iter().enumerate() {
			let record = registry.get(name)?;
			let url = locator.locate(name, registry)?;
			entries.push(FetchEntry {
				position,
				name: record.name.clone(),
				version: record.version.clone(),
				file_name: sequenced_file_name(position, &url),
				url,
			});
		}
		Ok(Self { entries })
	}

	pub fn entries(&self) -> &[FetchEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &FetchEntry> {
		self.entries.iter()
	}
}
