pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = tabplan_cli::VERSION,
	rename_all = "kebab",
	styles = tabplan_cli::styles(),
)]
pub struct Args {
	/// TOML config file. Built-in defaults and the environment are used when omitted.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = match args.config.as_deref() {
		Some(path) => tabplan_config::load(path)?,
		None => tabplan_config::load_default()?,
	};
	init_tracing(&config)?;
	let http_addr: SocketAddr = config.service.http_bind.parse()?;

	if config.providers.llm.api_key.is_none() {
		tracing::warn!(
			env = tabplan_config::API_KEY_ENV,
			"No LLM API key configured. The llm strategy will fail until one is set."
		);
	}

	let state = AppState::new(config);
	let app = routes::router(state);
	let http_listener = TcpListener::bind(http_addr).await?;
	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(http_listener, app).with_graceful_shutdown(shutdown_signal()).await?;
	Ok(())
}

fn init_tracing(config: &tabplan_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();
	Ok(())
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %err, "Failed to listen for shutdown signal.");
		std::future::pending::<()>().await;
	}
}
