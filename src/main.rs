use std::process::ExitCode;

use clap::Parser;

use nutrition_calc::{app, cli::Cli, logging};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.global.verbose);

    tracing::debug!("starting {}", nutrition_calc::metadata::PKG_NAME);
    app::run(cli).await
}
