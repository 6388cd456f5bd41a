use clap::Parser;
use feedreader::{
    api::{handlers::AppState, routes},
    cli::{commands, Cli, Commands},
    config::{feeds::FeedRegistry, Settings},
    loader::LoadOutcome,
    page::Page,
    Error, Result,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,feedreader=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    settings.validate()?;

    match cli.command {
        Commands::Serve { port, host } => {
            serve(settings, port, host).await?;
        }
        Commands::Feeds => {
            let registry = FeedRegistry::load_or_builtin(&settings.feeds.config_path)?;
            commands::list_feeds(&registry);
        }
        Commands::Load { index } => {
            let page = Page::from_settings(&settings)?;
            commands::load_feed(&page, index).await?;
        }
        Commands::Validate { url } => {
            commands::validate_feed(&url, &settings.fetcher).await?;
        }
    }

    Ok(())
}

async fn serve(mut settings: Settings, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        settings.server.port = port;
    }
    if let Some(host) = host {
        settings.server.host = host;
    }

    info!("Starting feed reader");

    let page = Arc::new(Page::from_settings(&settings)?);

    // The page opens on the first feed
    let _initial_load = page.loader().spawn_load(0, |outcome| match outcome {
        LoadOutcome::Rendered { name, .. } => info!("Initial feed loaded: {}", name),
        other => warn!("Initial feed load did not render: {:?}", other),
    });

    let app = routes::create_router(AppState { page });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    println!("\n========================================");
    println!("Feed Reader");
    println!("========================================");
    println!("Address: http://{addr}");
    println!("\nEndpoints:");
    println!("  GET  /");
    println!("  GET  /feeds/:index");
    println!("  POST /menu/toggle");
    println!("  GET  /api/feeds");
    println!("  POST /api/feeds/:index/load");
    println!("  GET  /api/entries");
    println!("  GET  /api/menu");
    println!("\nPress Ctrl+C to stop");
    println!("========================================\n");

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Internal(format!("Server error: {e}")))?;

    info!("Shutting down...");
    Ok(())
}
