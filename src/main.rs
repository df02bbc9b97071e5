use habit_client::{
    config::{resolve_port, ClientConfig},
    router, AppState, HabitClient, PendingNavigation,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = ClientConfig::from_env();
    if let Some(parent) = config.storage_path.as_deref().and_then(|path| path.parent()) {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let navigation = Arc::new(PendingNavigation::default());
    let client = HabitClient::connect(&config, navigation.clone()).await?;
    // Restore any session left in storage before serving the first page.
    let identity = client.session().refresh_identity().await;
    info!(
        api = %config.base_url,
        user = identity.as_ref().map(|identity| identity.username.as_str()).unwrap_or("-"),
        "client ready"
    );

    let app = router(AppState::new(client, navigation));

    let addr = SocketAddr::from(([127, 0, 0, 1], resolve_port()));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
