use std::io::{Read, Write};

use super::*;
use crate::Error::Parse;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Downloads the raw index document from `url`.
///
/// # Errors
/// - [`Reqwest`](crate::Error::Reqwest) on connection failures or a non-success status.
pub async fn fetch_index(client: &reqwest::Client, url: &str) -> crate::Result<Vec<u8>> {
	log::info!("Downloading package index from {}", url);
	let body = client
		.get(url)
		.send()
		.await?
		.error_for_status()?
		.bytes()
		.await?
		.to_vec();
	log::debug!("Downloaded package index, {} bytes", body.len());
	Ok(body)
}

/// Turns index bytes into text, decompressing them first if they are gzipped.
///
/// # Errors
/// - [`IO`](crate::Error::IO) when the gzip stream is corrupt.
/// - [`Parse`](crate::Error::Parse) when the document isn't UTF-8.
pub fn decode_index(bytes: &[u8]) -> crate::Result<String> {
	let bytes = if bytes.starts_with(&GZIP_MAGIC) {
		let mut v = Vec::<u8>::new();
		flate2::read::GzDecoder::new(bytes).read_to_end(&mut v)?;
		v
	} else {
		bytes.to_vec()
	};
	String::from_utf8(bytes).map_err(|e| Parse(format!("package index is not valid UTF-8: {}", e)))
}

impl Registry {
	/// Downloads and parses the index of the repository in `config`.
	pub async fn generate_latest(config: &crate::Config, client: &reqwest::Client) -> crate::Result<Self> {
		let url = config.index_url();
		let bytes = fetch_index(client, &url).await?;
		let mut registry = Self::generate_from_bytes(&bytes)?;
		registry.set_source(url);
		log::info!("Package registry contains {} packages", registry.len());
		Ok(registry)
	}

	/// Parses raw index bytes, compressed or not.
	pub fn generate_from_bytes(bytes: &[u8]) -> crate::Result<Self> {
		Self::from_index(&decode_index(bytes)?)
	}

	/* Serialization */

	pub fn cache_path(config: &crate::Config) -> std::path::PathBuf {
		config.data_dir().join("registry.bin")
	}

	/// Loads the registry cached by [`save_to_disk()`](Registry::save_to_disk()).
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when opening the file.
	/// - [`Bincode`](crate::error::Error::Bincode) when the cache is corrupt or from an older format.
	pub fn load_from_disk(config: &crate::Config) -> crate::Result<Self> {
		let file = std::fs::File::open(Self::cache_path(config))?;
		Ok(bincode::deserialize_from(std::io::BufReader::new(file))?)
	}

	/// Caches the registry in the data directory.
	///
	/// # Errors
	/// - [`IO`](crate::error::Error::IO) when creating the file or it's parent directories.
	/// - [`Bincode`](crate::error::Error::Bincode) when serializing.
	pub fn save_to_disk(&self, config: &crate::Config) -> crate::Result<()> {
		let path = Self::cache_path(config);
		std::fs::create_dir_all(config.data_dir())?;
		let file = std::fs::File::create(&path)?;
		let mut writer = std::io::BufWriter::new(file);
		bincode::serialize_into(&mut writer, self)?;
		writer.flush()?;
		log::debug!("Saved package registry to {}", path.display());
		Ok(())
	}
}
