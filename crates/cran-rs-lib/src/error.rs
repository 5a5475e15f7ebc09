//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("bincode error: {0}")]
	Bincode(#[from] bincode::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	/// The index document contained no stanzas at all.
	#[error("package index is empty")]
	EmptyIndex,
	/// A stanza of the index is unusable, the whole index is rejected.
	///
	/// `stanza` is the stanza's `Package` value when it has one, otherwise its position in the document.
	#[error("malformed index stanza {stanza}: {reason}")]
	AbortParse {
		stanza: String,
		reason: String,
	},
	/// A name was looked up that the registry has no entry for.
	#[error("package `{0}` does not exist in the registry")]
	UnknownPackage(String),
	#[error("downloader failed: {0}")]
	Download(#[from] crate::retrieval::download::DownloadError),
}
