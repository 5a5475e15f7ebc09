use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optmulti("p", "packages",   "Package to fetch along with its dependencies", "NAME");
		opts.optmulti("x", "exclude",    "Package to leave out, its dependencies are not followed", "NAME");
		opts.optopt(  "o", "output",     "Directory to save archives into", "DIR");
		opts.optopt(  "r", "repository", "Base address of the repository", "URL");
		opts.optflag( "",  "refresh",    "Ignore the cached registry and fetch the index again");
		opts.optflag( "n", "dry-run",    "Print the fetch plan as JSON without downloading");
		opts.optflag( "f", "force",      "Download archives even if they already exist");
		opts.optflag( "h", "help",       "Show help");
		opts.optflag( "v", "verbose",    "Increased vebosity");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(args.get(1..).unwrap_or_default()) {
			Ok(m)  => { m }
			Err(e) => { eprintln!("Unable to parse options: {}", e); return ExitCode::FAILURE }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: cran-rs-terminal [options] PACKAGE..."));
			return ExitCode::SUCCESS;
		}

		parsed_options
	};

	let default_filter = if parsed_options.opt_present("v") { "debug" } else { "info" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

	match run(&parsed_options).await {
		Ok(_) => ExitCode::SUCCESS,
		Err(e) => {
			log::error!("{}", e);
			ExitCode::FAILURE
		},
	}
}

async fn run(options: &getopts::Matches) -> Result<(), Error> {
	let mut config = cran_rs::Config::load_from_disk().unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		cran_rs::Config::default()
	});

	if let Some(repository) = options.opt_str("r") {
		config.set_repository_url(repository);
	}

	let requested: Vec<String> = options.opt_strs("p").into_iter().chain(options.free.iter().cloned()).collect();
	if requested.is_empty() {
		return Err(Error::MissingArgument("no packages requested"));
	}
	let excluded = options.opt_strs("x");

	let client = cran_rs::retrieval::build_client(&config)?;
	let registry = obtain_registry(&config, &client, options.opt_present("refresh")).await?;

	use cran_rs::relationship_resolver::ResolverBuilder;

	let resolver = ResolverBuilder::new(&registry)
		.builtins(cran_rs::BuiltInSet::from_config(&config))
		.add_package_requirements(requested)
		.exclude(excluded)
		.build()
		.resolve()?;

	let order = resolver.install_order()?;
	for cycle in order.cycles() {
		log::warn!("Packages depend on each other, order within the group is by name: {}", cycle.join(", "));
	}

	let locator = cran_rs::retrieval::ArchiveLocator::from_config(&config);
	let plan = cran_rs::FetchPlan::new(&order, &registry, &locator)?;
	log::info!("{} packages to fetch.", plan.len());

	if options.opt_present("n") {
		println!("{}", serde_json::to_string_pretty(&plan)?);
		return Ok(());
	}

	let destination = options.opt_str("o")
		.map(std::path::PathBuf::from)
		.unwrap_or_else(|| config.download_dir().clone());

	let download_results = cran_rs::retrieval::download_plan(&config, &client, &plan, &destination, options.opt_present("f")).await;
	let mut failed = Vec::new();
	for (entry, result) in &download_results {
		match result {
			Ok(path) => log::debug!("{} saved to {}", entry.name, path.display()),
			Err(e) => {
				log::error!("Failed to download package {}: {}", entry.name, e);
				failed.push(entry.name.clone());
			},
		}
	}
	if !failed.is_empty() {
		return Err(Error::Download(failed));
	}

	log::info!("Downloaded {} packages into {}", plan.len(), destination.display());
	Ok(())
}

/// Loads the cached registry, regenerating it when missing, unreadable, stale or `refresh` is set.
async fn obtain_registry(config: &cran_rs::Config, client: &reqwest::Client, refresh: bool) -> Result<cran_rs::Registry, Error> {
	async fn generate_and_save_new_registry(config: &cran_rs::Config, client: &reqwest::Client) -> cran_rs::Result<cran_rs::Registry> {
		let registry = cran_rs::Registry::generate_latest(config, client).await?;
		if let Err(e) = registry.save_to_disk(config) {
			log::warn!("Failed to save registry cache: {}", e);
		}
		Ok(registry)
	}

	if refresh {
		log::info!("Refreshing registry.");
		return Ok(generate_and_save_new_registry(config, client).await?);
	}

	match cran_rs::Registry::load_from_disk(config) {
		Ok(registry) if registry.source() == config.index_url() => {
			log::debug!("Using cached registry with {} packages.", registry.len());
			Ok(registry)
		},
		Ok(registry) => {
			log::info!("Cached registry is from {}, regenerating...", registry.source());
			Ok(generate_and_save_new_registry(config, client).await?)
		},
		Err(cran_rs::Error::IO(e)) if e.kind() == std::io::ErrorKind::NotFound => {
			log::info!("No cached registry, generating...");
			Ok(generate_and_save_new_registry(config, client).await?)
		},
		Err(e) => {
			log::warn!("Failed to open registry cache, format likely changed. regenerating... ({})", e);
			Ok(generate_and_save_new_registry(config, client).await?)
		},
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("CRAN-rs error: {0}")]
	CranRs(#[from] cran_rs::Error),
	#[error("Missing argument: {0}")]
	MissingArgument(&'static str),
	#[error("Failed to serialize plan: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("Failed to download: {}", .0.join(", "))]
	Download(Vec<String>),
}
