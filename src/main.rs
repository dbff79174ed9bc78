mod api_doc;
mod config;
mod error;
mod handlers;
mod models;
mod routes;
mod server;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use config::Config;
use server::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("rust-spanner-blog starting");

    let config = Config::from_env()?;
    config.log_startup();

    let mut server = Server::start(&config.database_url, &config.service_host, config.service_port).await?;
    tracing::info!(
        "Serving on {} (document store holds {} posts)",
        server.local_addr(),
        server.store().count().await?
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    server.stop().await
}
