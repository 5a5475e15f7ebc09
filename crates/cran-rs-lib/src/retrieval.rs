//! Getting package archives from the repository.

pub mod locator;
pub use locator::ArchiveLocator;
pub use locator::sequenced_file_name;

pub mod download;
pub use download::download_plan;

/// HTTP client honouring the config's `https_only` setting.
pub fn build_client(config: &crate::Config) -> crate::Result<reqwest::Client> {
	Ok(reqwest::Client::builder()
		.https_only(config.https_only())
		.build()?)
}
