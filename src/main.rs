use clap::Parser;
use tracing::error;

use geoproxy::cli::{Cli, Commands};
use geoproxy::config::StaticConfig;
use geoproxy::errors::GeoProxyError;
use geoproxy::runtime::modes::{run_generate_config, run_server};
use geoproxy::system::init_logging;

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("Fatal: {:#}", e);
        match e.downcast_ref::<GeoProxyError>() {
            Some(err) => eprintln!("{}", err.format_colored()),
            None => eprintln!("[ERROR] {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::GenerateConfig { path } => run_generate_config(path.as_deref()),
        Commands::Serve => {
            let config = StaticConfig::load(cli.config.as_deref())?;
            let _guard = init_logging(&config.logging)?;
            run_server(config).await
        }
    }
}
