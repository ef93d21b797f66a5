use dotenvy::dotenv;
use portal_client::config::get_configuration;
use portal_client::observability::init_tracing;
use portal_client::services::http::HttpGateway;
use portal_client::services::session::FileSessionStore;
use portal_client::{shell, App};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing("info");

    let gateway = Arc::new(
        HttpGateway::new(&configuration.gateway)
            .map_err(|e| anyhow::anyhow!("Failed to build gateway client: {}", e))?,
    );
    let sessions = FileSessionStore::load(configuration.session.path.clone());

    info!("Starting portal-client against {}", configuration.gateway.url);
    let mut app = App::new(gateway, Box::new(sessions));
    shell::run(&mut app).await
}
