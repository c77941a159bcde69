//! Catalog crawl driver
//!
//! Walks a paginated listing: fetch a page, extract its records, filter
//! out known duplicates, commit the survivors as one batch, follow the
//! next-page link. A fetch failure aborts the run; a commit failure only
//! costs that page. No error escapes to the caller — the run always
//! terminates with a report.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::domain::product::CandidateProduct;
use crate::domain::repositories::ProductStore;
use crate::infrastructure::html_parser::CatalogExtractor;
use crate::infrastructure::http_client::HttpClient;

/// Why a crawl run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlOutcome {
    /// Reached a page without a next-page marker.
    Completed,
    /// A page fetch failed (transport error or non-success status).
    FetchFailed,
    /// The next-page link pointed at an already-visited URL.
    CycleDetected,
    /// The configured page bound was reached before the listing ended.
    PageLimitReached,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub start_url: String,
    pub pages_visited: u32,
    pub products_seen: usize,
    pub products_inserted: usize,
    pub duplicates_skipped: usize,
    pub pages_rolled_back: usize,
    pub outcome: CrawlOutcome,
}

#[derive(Debug, Clone)]
pub struct CrawlLimits {
    pub max_pages: u32,
    pub request_delay_ms: u64,
}

pub struct CatalogCrawler {
    http: HttpClient,
    extractor: CatalogExtractor,
    store: Arc<dyn ProductStore>,
    limits: CrawlLimits,
}

impl CatalogCrawler {
    pub fn new(
        http: HttpClient,
        extractor: CatalogExtractor,
        store: Arc<dyn ProductStore>,
        limits: CrawlLimits,
    ) -> Self {
        Self {
            http,
            extractor,
            store,
            limits,
        }
    }

    pub async fn crawl(&self, start_url: &str) -> CrawlReport {
        let mut report = CrawlReport {
            start_url: start_url.to_string(),
            pages_visited: 0,
            products_seen: 0,
            products_inserted: 0,
            duplicates_skipped: 0,
            pages_rolled_back: 0,
            outcome: CrawlOutcome::Completed,
        };

        let mut visited: HashSet<String> = HashSet::new();
        let mut cursor = Some(start_url.to_string());

        while let Some(url) = cursor.take() {
            if !visited.insert(url.clone()) {
                warn!(%url, "next-page link loops back to a visited page, stopping");
                report.outcome = CrawlOutcome::CycleDetected;
                break;
            }
            if report.pages_visited >= self.limits.max_pages {
                warn!(
                    max_pages = self.limits.max_pages,
                    "page bound reached before the listing ended"
                );
                report.outcome = CrawlOutcome::PageLimitReached;
                break;
            }

            let body = match self.http.get_text(&url).await {
                Ok(body) => body,
                Err(err) => {
                    warn!(%url, error = %err, "page fetch failed, aborting run");
                    report.outcome = CrawlOutcome::FetchFailed;
                    break;
                }
            };
            report.pages_visited += 1;

            let page = self.extractor.extract(&body, &url);
            debug!(
                %url,
                category = %page.category,
                items = page.items.len(),
                "extracted listing page"
            );

            let mut batch = Vec::new();
            for item in page.items {
                report.products_seen += 1;
                let candidate =
                    CandidateProduct::new(page.category.clone(), item.name, item.price);
                match self
                    .store
                    .exists(&candidate.category, &candidate.name, &candidate.price)
                    .await
                {
                    Ok(true) => {
                        report.duplicates_skipped += 1;
                        debug!(
                            name = %candidate.name,
                            price = %candidate.price,
                            "skipping duplicate product"
                        );
                    }
                    Ok(false) => batch.push(candidate),
                    Err(err) => {
                        // Pre-filter only; the schema constraint decides
                        // at commit time.
                        warn!(error = %err, "duplicate check failed, deferring to commit");
                        batch.push(candidate);
                    }
                }
            }

            match self.store.insert_batch(&batch).await {
                Ok(inserted) => {
                    report.products_inserted += inserted;
                    if inserted > 0 {
                        info!(%url, inserted, "committed page batch");
                    }
                }
                Err(err) if err.is_unique_violation() => {
                    report.pages_rolled_back += 1;
                    warn!(%url, error = %err, "duplicate at commit, page batch rolled back");
                }
                Err(err) => {
                    report.pages_rolled_back += 1;
                    error!(%url, error = %err, "store failure, page batch rolled back");
                }
            }

            if let Some(next) = page.next_page {
                if self.limits.request_delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(self.limits.request_delay_ms)).await;
                }
                cursor = Some(next);
            }
        }

        info!(
            pages = report.pages_visited,
            seen = report.products_seen,
            inserted = report.products_inserted,
            duplicates = report.duplicates_skipped,
            rolled_back = report.pages_rolled_back,
            outcome = ?report.outcome,
            "crawl run finished"
        );
        report
    }
}
