//! Downloads the archives of a [`FetchPlan`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::plan::{FetchEntry, FetchPlan};

/// Errors that can occur during the download process.
#[derive(Debug, Error)]
pub enum DownloadError {
	/// The server answered with something other than success.
	#[error("{url} returned HTTP status {status}")]
	HttpStatus {
		url: String,
		status: u16,
	},
	/// The download task stopped before reporting a result.
	#[error("download task failed: {0}")]
	TaskFailed(String),
	/// Not downloaded or kept because an earlier package failed.
	#[error("aborted after an earlier download failed")]
	Aborted,
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
}

/// Downloads every entry of `plan` into `destination`.
///
/// At most [`Config::max_concurrent_downloads()`](crate::Config::max_concurrent_downloads()) archives are fetched at once.
/// The first failure stops any download not yet started. Archives only take their final name once every entry
/// before them has succeeded, so the sequenced files on disk never skip a position.
///
/// # Parameters
/// - `config` - Required for the concurrency limit.
/// - `client` - Client to download archives with.
/// - `plan` - Archives to download, saved under their [`FetchEntry::file_name`].
/// - `destination` - Directory to save into, created if needed.
/// - `force` - Overwrite existing downloads.
///
/// # Returns
/// One result per entry in plan order, the path of the archive or why it couldn't be downloaded.
/// Entries after a failure report [`DownloadError::Aborted`] unless they failed on their own.
pub async fn download_plan<'plan>(config: &crate::Config, client: &reqwest::Client, plan: &'plan FetchPlan, destination: &Path, force: bool)
-> Vec<(&'plan FetchEntry, Result<PathBuf, DownloadError>)> {
	let permits = Arc::new(tokio::sync::Semaphore::new(config.max_concurrent_downloads()));
	let mut tasks = tokio::task::JoinSet::new();

	for entry in plan.iter() {
		let permits = permits.clone();
		let client = client.clone();
		let position = entry.position;
		let name = entry.name.clone();
		let url = entry.url.clone();
		let path = destination.join(&entry.file_name);

		tasks.spawn(async move {
			let result = match permits.clone().acquire_owned().await {
				Ok(_permit) => download_archive(&client, &name, &url, path, force).await,
				Err(_) => Err(DownloadError::Aborted),
			};
			if result.is_err() {
				/* Queued downloads fail to acquire once closed */
				permits.close();
			}
			(position, result)
		});
	}

	let mut results: Vec<Option<Result<Fetched, DownloadError>>> = plan.iter().map(|_| None).collect();
	while let Some(joined) = tasks.join_next().await {
		match joined {
			Ok((position, result)) => {
				if let Some(slot) = results.get_mut(position) {
					*slot = Some(result);
				}
			},
			Err(e) => log::error!("Download task failed: {}", e),
		}
	}

	let mut failed = false;
	let mut finished = Vec::with_capacity(plan.len());
	for (entry, result) in plan.iter().zip(results) {
		let result = result.unwrap_or_else(|| Err(DownloadError::TaskFailed(format!("no result for {}", entry.name))));
		let result = match result {
			Ok(fetched) if failed => {
				fetched.discard().await;
				Err(DownloadError::Aborted)
			},
			Ok(fetched) => fetched.publish().await,
			Err(e) => Err(e),
		};
		if result.is_err() {
			failed = true;
		}
		finished.push((entry, result));
	}
	finished
}

/// An archive that is on disk, either from an earlier run or waiting under its `.part` name.
enum Fetched {
	Existing(PathBuf),
	Staged {
		part: PathBuf,
		path: PathBuf,
	},
}

impl Fetched {
	async fn publish(self) -> Result<PathBuf, DownloadError> {
		match self {
			Fetched::Existing(path) => Ok(path),
			Fetched::Staged { part, path } => {
				tokio::fs::rename(&part, &path).await?;
				Ok(path)
			},
		}
	}

	async fn discard(self) {
		if let Fetched::Staged { part, .. } = self {
			if let Err(e) = tokio::fs::remove_file(&part).await {
				log::warn!("Failed to remove partial download {}: {}", part.display(), e);
			}
		}
	}
}

/// Fetches a single archive next to `path` with a `.part` suffix.
async fn download_archive(client: &reqwest::Client, name: &str, url: &str, path: PathBuf, force: bool) -> Result<Fetched, DownloadError> {
	if path.exists() && !force {
		log::info!("Package {} already downloaded, skipping.", name);
		return Ok(Fetched::Existing(path));
	}

	if let Some(parent) = path.parent() {
		tokio::fs::create_dir_all(parent).await?;
	}

	log::info!("Downloading package {} from {}", name, url);
	let response = client.get(url).send().await?;
	let status = response.status();
	if !status.is_success() {
		return Err(DownloadError::HttpStatus { url: url.to_string(), status: status.as_u16() });
	}
	let content = response.bytes().await?;

	let mut part = path.clone().into_os_string();
	part.push(".part");
	let part = PathBuf::from(part);

	log::debug!("Writing package download to disk: {}", part.display());
	tokio::fs::write(&part, &content).await?;

	Ok(Fetched::Staged { part, path })
}
