//! Crawl run orchestration
//!
//! A single-slot gate around the crawl driver: the scheduled trigger
//! waits its turn, the on-demand trigger refuses to overlap an in-flight
//! run. Each run is tagged with a fresh id in the log stream.

use tokio::sync::Mutex;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::infrastructure::crawling::{CatalogCrawler, CrawlReport};

pub struct CrawlService {
    crawler: CatalogCrawler,
    gate: Mutex<()>,
}

impl CrawlService {
    pub fn new(crawler: CatalogCrawler) -> Self {
        Self {
            crawler,
            gate: Mutex::new(()),
        }
    }

    /// Run a crawl, waiting for any in-flight run to finish first.
    pub async fn run(&self, url: &str) -> CrawlReport {
        let _slot = self.gate.lock().await;
        self.execute(url).await
    }

    /// Run a crawl only if no other run is in flight.
    pub async fn try_run(&self, url: &str) -> Option<CrawlReport> {
        let _slot = self.gate.try_lock().ok()?;
        Some(self.execute(url).await)
    }

    async fn execute(&self, url: &str) -> CrawlReport {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("crawl_run", %run_id);
        async {
            info!(%url, "starting crawl run");
            self.crawler.crawl(url).await
        }
        .instrument(span)
        .await
    }
}
