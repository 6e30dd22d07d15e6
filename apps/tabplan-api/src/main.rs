use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = tabplan_api::Args::parse();
	tabplan_api::run(args).await
}
