//! Where a package's source archive lives.
//!
//! Archives are addressed as `<base>/<name>_<version>.<extension>`, e.g.
//! `https://cran.microsoft.com/snapshot/2020-01-01/src/contrib/ggplot2_3.2.1.tar.gz`.

use crate::registry::{PackageRecord, Registry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLocator {
	base: String,
	extension: String,
}

impl ArchiveLocator {
	pub fn new(base: impl Into<String>, extension: impl Into<String>) -> Self {
		let base = base.into();
		let extension = extension.into();
		Self {
			base: base.trim_end_matches('/').to_string(),
			extension: extension.trim_start_matches('.').to_string(),
		}
	}

	pub fn from_config(config: &crate::Config) -> Self {
		Self::new(config.repository_url(), config.archive_extension())
	}

	pub fn base(&self) -> &str {
		&self.base
	}

	/// Address of `name`'s archive at the version listed in `registry`.
	///
	/// # Errors
	/// [`UnknownPackage`](crate::Error::UnknownPackage) when `name` isn't in `registry`.
	pub fn locate(&self, name: &str, registry: &Registry) -> crate::Result<String> {
		let record = registry.get(name)?;
		Ok(format!("{}/{}", self.base, self.archive_file_name(record)))
	}

	/// `<name>_<version>.<extension>`
	pub fn archive_file_name(&self, record: &PackageRecord) -> String {
		format!("{}_{}.{}", record.name, record.version, self.extension)
	}
}

/// Local file name for the archive at `address` when it is the `position`th package to install.
///
/// The position is zero padded to three digits so names sort in install order, e.g. `007_somepkg_1.2.3.tar.gz`.
pub fn sequenced_file_name(position: usize, address: &str) -> String {
	let base_name = address.rsplit('/').next().unwrap_or(address);
	format!("{:03}_{}", position, base_name)
}
