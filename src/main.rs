use anyhow::{Context, Result};
use multilingual_routes::{
    app,
    config::Config,
    i18n::Catalog,
    routing::{Registrar, RouteTable},
};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when the environment is already set)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("multilingual_routes=info".parse()?),
        )
        .init();

    info!("Starting multilingual routes server");

    let config = Config::from_env()?;

    let catalog = if Path::new(&config.lang_path).is_dir() {
        Catalog::from_dir(&config.lang_path)?
    } else {
        warn!(
            "Translation directory {} not found, route URIs fall back to keys",
            config.lang_path
        );
        Catalog::new()
    };

    let mut registrar = Registrar::new(
        RouteTable::new(&config.app_url),
        config.locales(),
        Arc::new(catalog),
        config.flags(),
    );
    app::register_demo_routes(&mut registrar)?;

    let urls = registrar.finish();
    info!(
        "Registered {} routes for locales {:?}",
        urls.router().len(),
        urls.locales().as_slice()
    );
    multilingual_routes::install(urls.clone())?;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app::build_app(urls)).await?;
    Ok(())
}
