mod logging;
mod routes;
mod settings;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use portal_engine::Portal;
use portal_logging::portal_info;

use settings::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level, &cli.log_file);

    let config = settings::load_config(&cli)?;
    portal_info!("portal at {}", config.base_url);
    let portal = Arc::new(Portal::with_reqwest(config));

    let listener = tokio::net::TcpListener::bind(&cli.listen)
        .await
        .with_context(|| format!("binding {}", cli.listen))?;
    portal_info!("listening on http://{}", cli.listen);
    axum::serve(listener, routes::router(portal))
        .await
        .context("server stopped")?;
    Ok(())
}
