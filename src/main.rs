use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast;
use tracing::info;

use pricewatch::api::{self, AppState};
use pricewatch::application::{CrawlScheduler, CrawlService};
use pricewatch::domain::ProductStore;
use pricewatch::infrastructure::config::AppConfig;
use pricewatch::infrastructure::crawling::{CatalogCrawler, CrawlLimits};
use pricewatch::infrastructure::database_connection::DatabaseConnection;
use pricewatch::infrastructure::html_parser::CatalogExtractor;
use pricewatch::infrastructure::http_client::{HttpClient, HttpClientConfig};
use pricewatch::infrastructure::logging::init_logging;
use pricewatch::infrastructure::repositories::SqliteProductRepository;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting pricewatch");

    let db = DatabaseConnection::new(&config.database)
        .await
        .context("failed to open database")?;
    db.migrate().await.context("failed to apply database schema")?;
    let store: Arc<dyn ProductStore> =
        Arc::new(SqliteProductRepository::new(db.pool().clone()));

    let extractor = CatalogExtractor::new(&config.crawler.selectors)
        .context("invalid extraction selectors")?;
    let http = HttpClient::new(&HttpClientConfig {
        user_agent: config.crawler.user_agent.clone(),
        timeout_secs: config.crawler.request_timeout_secs,
        max_requests_per_second: config.crawler.max_requests_per_second,
    })?;
    let crawler = CatalogCrawler::new(
        http,
        extractor,
        store.clone(),
        CrawlLimits {
            max_pages: config.crawler.max_pages,
            request_delay_ms: config.crawler.request_delay_ms,
        },
    );
    let crawl = Arc::new(CrawlService::new(crawler));

    let scheduler = Arc::new(CrawlScheduler::new(
        crawl.clone(),
        Duration::from_secs(config.schedule.interval_hours * 3600),
        config.crawler.start_url.clone(),
    ));
    tokio::spawn(Arc::clone(&scheduler).run());

    let (events, _) = broadcast::channel(64);
    let app = api::router(AppState {
        store,
        crawl,
        scheduler,
        events,
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => tracing::error!(error = %err, "failed to install shutdown handler"),
    }
}
