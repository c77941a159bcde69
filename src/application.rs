//! Application services: crawl run orchestration and the recurring schedule.

pub mod crawl_service;
pub mod scheduler;

pub use crawl_service::CrawlService;
pub use scheduler::CrawlScheduler;
