use ecosmart_api::{build_catalog_store, build_state, config::Config, routes::create_router};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ecosmart_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = build_catalog_store(&config).await?;
    tracing::info!(store = catalog.name(), "Catalog store ready");

    let state = build_state(&config, catalog);
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
