//! Main entry point for the crowdfund service.
//!
//! Loads configuration, builds the crowdfund engine and serves the HTTP API
//! used by the browser front-end to create campaigns, donate and claim
//! refunds through trails.

use clap::Parser;
use crowdfund_config::{ApiConfig, Config};
use crowdfund_core::{CrowdfundBuilder, CrowdfundEngine};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the crowdfund service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", env = "CROWDFUND_CONFIG")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the crowdfund service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the crowdfund engine
/// 5. Serves the API until interrupted
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started crowdfund service");

	let config = Config::from_file(&args.config).await?;
	tracing::info!(
		app = %config.app.name,
		trails = %config.trails.base_url,
		identity_enabled = config.identity.is_enabled(),
		"Loaded configuration"
	);

	let engine = Arc::new(build_engine(config.clone())?);

	let Some(api_config) = config.api.filter(|api| api.enabled) else {
		tracing::warn!("API server disabled in configuration, nothing to serve");
		return Ok(());
	};

	tokio::select! {
		result = serve(api_config, engine) => {
			result?;
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Stopped crowdfund service");
	Ok(())
}

fn build_engine(config: Config) -> Result<CrowdfundEngine, Box<dyn std::error::Error>> {
	Ok(CrowdfundBuilder::new(config).build()?)
}

async fn serve(
	api_config: ApiConfig,
	engine: Arc<CrowdfundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let session = engine.session().await;
	match session.address.as_deref() {
		Some(address) => tracing::info!(%address, "Wallet connected"),
		None if session.identity_enabled => tracing::info!("Wallet not connected yet"),
		None => tracing::info!("Serving read-only API"),
	}
	server::start_server(api_config, engine).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[tokio::test]
	async fn test_engine_from_config_file() {
		let mut file = NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[app]
name = "crowdfund-test"

[trails]
min_interval_ms = 1000

[identity]
app_id = ""

[api]
enabled = true
port = 3100
"#
		)
		.unwrap();

		let config = Config::from_file(file.path()).await.unwrap();
		let engine = build_engine(config).unwrap();

		assert_eq!(engine.config().app.name, "crowdfund-test");
		assert!(engine.wallet().is_none());
		assert_eq!(engine.config().api.as_ref().map(|api| api.port), Some(3100));
	}

	#[test]
	fn test_args_defaults() {
		let args = Args::parse_from(["crowdfund"]);
		assert_eq!(args.log_level, "info");
	}
}
