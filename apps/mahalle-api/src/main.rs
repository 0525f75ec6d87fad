use clap::Parser;
use mahalle_api::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	mahalle_api::run(Args::parse()).await
}
