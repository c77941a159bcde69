//! Infrastructure layer: configuration, logging, HTTP fetching, HTML
//! extraction, database access, and the crawl driver.

pub mod config;
pub mod crawling;
pub mod database_connection;
pub mod html_parser;
pub mod http_client;
pub mod logging;
pub mod repositories;

pub use config::AppConfig;
pub use crawling::{CatalogCrawler, CrawlLimits, CrawlOutcome, CrawlReport};
pub use database_connection::DatabaseConnection;
pub use html_parser::CatalogExtractor;
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::init_logging;
pub use repositories::SqliteProductRepository;
