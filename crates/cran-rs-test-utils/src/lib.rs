//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::http::{StatusCode, Uri};

/// A trimmed copy of a real CRAN index, 34 packages closed under `ggplot2`'s dependencies.
pub const SMALL_INDEX: &str = include_str!("../data/PACKAGES-small");

#[derive(Debug, thiserror::Error)]
pub enum TestUtilsError {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("CRAN-rs error: {0}")]
	CranRs(#[from] cran_rs::Error),
}

/// Parses [`SMALL_INDEX`].
pub fn small_registry() -> Result<cran_rs::Registry, TestUtilsError> {
	Ok(cran_rs::Registry::from_index(SMALL_INDEX)?)
}

/// Builds a registry from `(name, dependencies)` pairs, every package at version `1.0`.
pub fn registry_from_edges(packages: &[(&str, &[&str])]) -> cran_rs::Registry {
	cran_rs::Registry::from_records(
		packages.iter().map(|(name, deps)| cran_rs::PackageRecord::new(*name, "1.0", deps.iter().copied()))
	)
}

/// A config that keeps all of its state inside `dir` and allows plain HTTP.
pub fn scratch_config(dir: &std::path::Path) -> cran_rs::Config {
	let mut config = cran_rs::Config::default();
	config.set_data_dir(dir.join("data"));
	config.set_download_dir(dir.join("downloads"));
	config.set_https_only(false);
	config
}

/// A local repository serving fixed files, for exercising downloads without the network.
///
/// Unknown paths get a 404. The server stops when dropped.
pub struct TestServer {
	address: SocketAddr,
	requests: Arc<AtomicUsize>,
	handle: tokio::task::JoinHandle<()>,
}

#[derive(Clone)]
struct ServedFiles {
	files: Arc<HashMap<String, Vec<u8>>>,
	requests: Arc<AtomicUsize>,
}

impl TestServer {
	/// Starts serving `files`, keyed by path without the leading slash.
	pub async fn start(files: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Result<Self, TestUtilsError> {
		let state = ServedFiles {
			files: Arc::new(files.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
			requests: Arc::new(AtomicUsize::new(0)),
		};
		let requests = state.requests.clone();

		let app = axum::Router::new()
			.fallback(serve_file)
			.with_state(state);

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let address = listener.local_addr()?;

		let handle = tokio::spawn(async move {
			if let Err(e) = axum::serve(listener, app).await {
				log::warn!("Test server stopped with error: {}", e);
			}
		});

		Ok(Self { address, requests, handle })
	}

	/// Base address, e.g. `http://127.0.0.1:4242`.
	pub fn url(&self) -> String {
		format!("http://{}", self.address)
	}

	/// Number of requests answered so far.
	pub fn request_count(&self) -> usize {
		self.requests.load(Ordering::SeqCst)
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

async fn serve_file(State(state): State<ServedFiles>, uri: Uri) -> (StatusCode, Vec<u8>) {
	state.requests.fetch_add(1, Ordering::SeqCst);
	match state.files.get(uri.path().trim_start_matches('/')) {
		Some(body) => (StatusCode::OK, body.clone()),
		None => (StatusCode::NOT_FOUND, b"not found".to_vec()),
	}
}
