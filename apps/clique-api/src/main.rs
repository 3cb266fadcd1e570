use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = clique_api::Args::parse();

	clique_api::run(args).await
}
