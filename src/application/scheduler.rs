//! Recurring crawl schedule
//!
//! One background task per process: crawl the current target URL, sleep
//! the configured interval measured from run completion, repeat. The
//! target URL is scheduler-owned state, replaceable at runtime through
//! the API.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use crate::application::crawl_service::CrawlService;

pub struct CrawlScheduler {
    service: Arc<CrawlService>,
    interval: Duration,
    target_url: RwLock<String>,
}

impl CrawlScheduler {
    pub fn new(service: Arc<CrawlService>, interval: Duration, initial_url: String) -> Self {
        Self {
            service,
            interval,
            target_url: RwLock::new(initial_url),
        }
    }

    pub async fn target_url(&self) -> String {
        self.target_url.read().await.clone()
    }

    /// Replace the URL used by subsequent scheduled runs. Does not affect
    /// a run already in flight.
    pub async fn set_target_url(&self, url: String) {
        info!(%url, "scheduled crawl URL updated");
        *self.target_url.write().await = url;
    }

    pub async fn run(self: Arc<Self>) {
        loop {
            let url = self.target_url().await;
            let report = self.service.run(&url).await;
            info!(
                pages = report.pages_visited,
                inserted = report.products_inserted,
                interval_secs = self.interval.as_secs(),
                "scheduled crawl finished, sleeping until next run"
            );
            tokio::time::sleep(self.interval).await;
        }
    }
}
