//! User configuration.
//!
//! Stored as JSON in `$XDG_CONFIG_HOME/cran-rs/config.json`, missing fields take their default values.

use std::path::PathBuf;
use serde::{Serialize, Deserialize};

/// Snapshot the original package set was pinned to.
pub const DEFAULT_REPOSITORY_URL: &str = "https://cran.microsoft.com/snapshot/2020-01-01/src/contrib";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	repository_url: String,
	index_file: String,
	archive_extension: String,
	download_dir: PathBuf,
	data_dir: PathBuf,
	https_only: bool,
	max_concurrent_downloads: usize,
	extra_builtins: Vec<String>,
}

/// Resolves an XDG base directory, falling back to `$HOME/<fallback>` and finally the working directory.
fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
	#[cfg(target_os = "windows")]
	let path = std::env::var("APPDATA").map(PathBuf::from).ok();

	#[cfg(not(target_os = "windows"))]
	let path = if let Ok(e) = std::env::var(var) {
		Some(PathBuf::from(e))
	} else {
		std::env::var("HOME").ok().map(|home| PathBuf::from(home).join(fallback))
	};

	path.unwrap_or_else(|| PathBuf::from("."))
}

impl Default for Config {
	fn default() -> Self {
		Self {
			repository_url: DEFAULT_REPOSITORY_URL.to_string(),
			index_file: "PACKAGES".to_string(),
			archive_extension: "tar.gz".to_string(),
			/* Archives land next to the caller unless told otherwise */
			download_dir: PathBuf::from("."),
			data_dir: xdg_dir("XDG_DATA_HOME", ".local/share").join("cran-rs"),
			https_only: true,
			max_concurrent_downloads: 4,
			extra_builtins: Vec::new(),
		}
	}
}

impl Config {
	/// Location of the config file on this system.
	pub fn config_path() -> PathBuf {
		xdg_dir("XDG_CONFIG_HOME", ".config").join("cran-rs").join("config.json")
	}

	/// Loads the config from [`Config::config_path()`].
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when the file can't be opened.
	/// - [`SerdeJSON`](crate::error::Error::SerdeJSON) when the file isn't a valid config.
	pub fn load_from_disk() -> crate::Result<Self> {
		Self::load_from_file(Self::config_path())
	}

	pub fn load_from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	/// Saves the config to [`Config::config_path()`], creating parent directories as needed.
	pub fn save_to_disk(&self) -> crate::Result<()> {
		self.save_to_file(Self::config_path())
	}

	pub fn save_to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		let file = std::fs::File::create(path)?;
		serde_json::to_writer_pretty(file, self)?;
		Ok(())
	}

	pub fn repository_url(&self) -> &str {
		&self.repository_url
	}
	pub fn set_repository_url(&mut self, repository_url: impl Into<String>) {
		self.repository_url = repository_url.into();
	}

	/// Address of the index document inside the repository.
	pub fn index_url(&self) -> String {
		format!("{}/{}", self.repository_url.trim_end_matches('/'), self.index_file)
	}

	pub fn index_file(&self) -> &str {
		&self.index_file
	}
	/// `PACKAGES.gz` is also accepted, compressed indexes are detected when read.
	pub fn set_index_file(&mut self, index_file: impl Into<String>) {
		self.index_file = index_file.into();
	}

	pub fn archive_extension(&self) -> &str {
		&self.archive_extension
	}
	pub fn set_archive_extension(&mut self, archive_extension: impl Into<String>) {
		self.archive_extension = archive_extension.into();
	}

	pub fn download_dir(&self) -> &PathBuf {
		&self.download_dir
	}
	pub fn set_download_dir(&mut self, download_dir: PathBuf) {
		self.download_dir = download_dir;
	}

	pub fn data_dir(&self) -> &PathBuf {
		&self.data_dir
	}
	pub fn set_data_dir(&mut self, data_dir: PathBuf) {
		self.data_dir = data_dir;
	}

	pub fn https_only(&self) -> bool {
		self.https_only
	}
	pub fn set_https_only(&mut self, https_only: bool) {
		self.https_only = https_only;
	}

	/// Never less than one.
	pub fn max_concurrent_downloads(&self) -> usize {
		self.max_concurrent_downloads.max(1)
	}
	pub fn set_max_concurrent_downloads(&mut self, max: usize) {
		self.max_concurrent_downloads = max;
	}

	/// Names treated as built in on top of [`crate::builtin::R_INCLUDED`].
	pub fn extra_builtins(&self) -> &[String] {
		&self.extra_builtins
	}
	pub fn set_extra_builtins(&mut self, extra_builtins: Vec<String>) {
		self.extra_builtins = extra_builtins;
	}
}
