use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = estimo_api::Args::parse();

	estimo_api::run(args).await
}
