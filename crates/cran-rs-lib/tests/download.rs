use cran_rs::relationship_resolver::ResolverBuilder;
use cran_rs::retrieval::download::DownloadError;
use cran_rs_test_utils::TestServer;

fn init_logging() {
	let _ = env_logger::builder().is_test(true).try_init();
}

/// Serves the fixture index plus an archive for every package in it.
async fn repository() -> TestServer {
	let registry = cran_rs_test_utils::small_registry().expect("fixture index should parse");
	let mut files: Vec<(String, Vec<u8>)> = registry
		.packages()
		.map(|p| (format!("{}_{}.tar.gz", p.name, p.version), format!("archive of {}", p.name).into_bytes()))
		.collect();
	files.push(("PACKAGES".to_string(), cran_rs_test_utils::SMALL_INDEX.as_bytes().to_vec()));
	TestServer::start(files).await.expect("start test server")
}

#[tokio::test]
async fn fetch_and_download_stringr() {
	init_logging();
	let server = repository().await;
	let dir = tempfile::tempdir().expect("create tempdir");
	let mut config = cran_rs_test_utils::scratch_config(dir.path());
	config.set_repository_url(server.url());

	let client = cran_rs::retrieval::build_client(&config).expect("build client");
	let registry = cran_rs::Registry::generate_latest(&config, &client).await.expect("generate registry");
	assert_eq!(registry.len(), 34);
	assert_eq!(registry.source(), config.index_url());

	registry.save_to_disk(&config).expect("save registry");
	assert_eq!(cran_rs::Registry::load_from_disk(&config).expect("load registry"), registry);

	let order = ResolverBuilder::new(&registry)
		.add_package_requirements(["stringr"])
		.build()
		.resolve()
		.expect("resolve stringr")
		.install_order()
		.expect("install order");
	let locator = cran_rs::retrieval::ArchiveLocator::from_config(&config);
	let plan = cran_rs::FetchPlan::new(&order, &registry, &locator).expect("build plan");
	assert_eq!(plan.len(), 4);
	assert_eq!(plan.entries().last().map(|e| e.file_name.as_str()), Some("003_stringr_1.4.0.tar.gz"));

	let results = cran_rs::retrieval::download_plan(&config, &client, &plan, config.download_dir(), false).await;
	assert_eq!(results.len(), 4);
	for (entry, result) in &results {
		let path = result.as_ref().expect("download should succeed");
		assert_eq!(path, &config.download_dir().join(&entry.file_name));
		let content = std::fs::read_to_string(path).expect("read downloaded archive");
		assert_eq!(content, format!("archive of {}", entry.name));
	}

	/* No partial files are left behind */
	let leftovers = std::fs::read_dir(config.download_dir()).expect("list downloads")
		.filter_map(|e| e.ok())
		.filter(|e| e.path().extension().map_or(false, |ext| ext == "part"))
		.count();
	assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn existing_archives_are_skipped_unless_forced() {
	init_logging();
	let server = repository().await;
	let dir = tempfile::tempdir().expect("create tempdir");
	let mut config = cran_rs_test_utils::scratch_config(dir.path());
	config.set_repository_url(server.url());
	let client = cran_rs::retrieval::build_client(&config).expect("build client");

	let registry = cran_rs_test_utils::small_registry().expect("fixture index should parse");
	let order = ResolverBuilder::new(&registry)
		.add_package_requirements(["magrittr"])
		.build()
		.resolve()
		.expect("resolve magrittr")
		.install_order()
		.expect("install order");
	let locator = cran_rs::retrieval::ArchiveLocator::from_config(&config);
	let plan = cran_rs::FetchPlan::new(&order, &registry, &locator).expect("build plan");

	let existing = config.download_dir().join("000_magrittr_1.5.tar.gz");
	std::fs::create_dir_all(config.download_dir()).expect("create download dir");
	std::fs::write(&existing, "stale").expect("write existing archive");

	let results = cran_rs::retrieval::download_plan(&config, &client, &plan, config.download_dir(), false).await;
	assert!(results[0].1.is_ok());
	assert_eq!(server.request_count(), 0);
	assert_eq!(std::fs::read_to_string(&existing).expect("read archive"), "stale");

	let results = cran_rs::retrieval::download_plan(&config, &client, &plan, config.download_dir(), true).await;
	assert!(results[0].1.is_ok());
	assert_eq!(server.request_count(), 1);
	assert_eq!(std::fs::read_to_string(&existing).expect("read archive"), "archive of magrittr");
}

#[tokio::test]
async fn missing_archive_reports_http_status() {
	init_logging();
	let server = TestServer::start(Vec::<(String, Vec<u8>)>::new()).await.expect("start test server");
	let dir = tempfile::tempdir().expect("create tempdir");
	let mut config = cran_rs_test_utils::scratch_config(dir.path());
	config.set_repository_url(server.url());
	let client = cran_rs::retrieval::build_client(&config).expect("build client");

	let registry = cran_rs_test_utils::registry_from_edges(&[("gone", &[])]);
	let order = ResolverBuilder::new(&registry)
		.add_package_requirements(["gone"])
		.build()
		.resolve()
		.expect("resolve gone")
		.install_order()
		.expect("install order");
	let locator = cran_rs::retrieval::ArchiveLocator::from_config(&config);
	let plan = cran_rs::FetchPlan::new(&order, &registry, &locator).expect("build plan");

	let results = cran_rs::retrieval::download_plan(&config, &client, &plan, config.download_dir(), false).await;
	match &results[0].1 {
		Err(DownloadError::HttpStatus { status, url }) => {
			assert_eq!(*status, 404);
			assert!(url.ends_with("/gone_1.0.tar.gz"));
		},
		other => panic!("expected a 404, got {:?}", other),
	}
	assert!(!config.download_dir().join("000_gone_1.0.tar.gz").exists());

	/* The index is fetched the same way */
	match cran_rs::Registry::generate_latest(&config, &client).await {
		Err(cran_rs::Error::Reqwest(e)) => assert_eq!(e.status().map(|s| s.as_u16()), Some(404)),
		other => panic!("expected the missing index to fail, got {:?}", other),
	}
}

#[tokio::test]
async fn failure_leaves_no_gap_in_sequence() {
	init_logging();
	let server = TestServer::start([
		("c_1.0.tar.gz", b"archive of c".to_vec()),
		("a_1.0.tar.gz", b"archive of a".to_vec()),
	]).await.expect("start test server");
	let dir = tempfile::tempdir().expect("create tempdir");
	let mut config = cran_rs_test_utils::scratch_config(dir.path());
	config.set_repository_url(server.url());
	let client = cran_rs::retrieval::build_client(&config).expect("build client");

	let registry = cran_rs_test_utils::registry_from_edges(&[("a", &["b"]), ("b", &["c"]), ("c", &[])]);
	let order = ResolverBuilder::new(&registry)
		.add_package_requirements(["a"])
		.build()
		.resolve()
		.expect("resolve a")
		.install_order()
		.expect("install order");
	let locator = cran_rs::retrieval::ArchiveLocator::from_config(&config);
	let plan = cran_rs::FetchPlan::new(&order, &registry, &locator).expect("build plan");
	assert_eq!(order.sequence(), ["c", "b", "a"]);

	let results = cran_rs::retrieval::download_plan(&config, &client, &plan, config.download_dir(), false).await;
	assert!(results[0].1.is_ok());
	assert!(matches!(results[1].1, Err(DownloadError::HttpStatus { status: 404, .. })));
	assert!(matches!(results[2].1, Err(DownloadError::Aborted)));

	let mut on_disk: Vec<String> = std::fs::read_dir(config.download_dir()).expect("list downloads")
		.filter_map(|e| e.ok())
		.map(|e| e.file_name().to_string_lossy().into_owned())
		.collect();
	on_disk.sort();
	assert_eq!(on_disk, ["000_c_1.0.tar.gz"]);
}

#[tokio::test]
async fn plain_http_is_refused_when_https_only() {
	init_logging();
	let server = repository().await;
	let dir = tempfile::tempdir().expect("create tempdir");
	let mut config = cran_rs_test_utils::scratch_config(dir.path());
	config.set_repository_url(server.url());
	config.set_https_only(true);
	let client = cran_rs::retrieval::build_client(&config).expect("build client");

	assert!(cran_rs::registry::fetch_index(&client, &config.index_url()).await.is_err());
	assert_eq!(server.request_count(), 0);
}
