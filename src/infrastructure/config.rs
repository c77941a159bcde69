//! Application configuration
//!
//! Layered loading: built-in defaults, an optional TOML file (path taken
//! from `PRICEWATCH_CONFIG`, default `pricewatch.toml`), and `PRICEWATCH_*`
//! environment overrides, e.g. `PRICEWATCH_SERVER__PORT=9000`.

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub crawler: CrawlerConfig,
    pub schedule: ScheduleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/pricewatch.db".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Listing URL the scheduler starts from.
    pub start_url: String,

    /// Upper bound on pages walked in one run.
    pub max_pages: u32,

    /// Pause between consecutive page fetches.
    pub request_delay_ms: u64,

    pub request_timeout_secs: u64,
    pub max_requests_per_second: u32,
    pub user_agent: String,

    pub selectors: SelectorConfig,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: "https://www.maxidom.ru/catalog/svarochnoe-oborudovanie/".to_string(),
            max_pages: 200,
            request_delay_ms: 500,
            request_timeout_secs: 30,
            max_requests_per_second: 2,
            user_agent: format!("pricewatch/{} (catalog monitor)", env!("CARGO_PKG_VERSION")),
            selectors: SelectorConfig::default(),
        }
    }
}

/// CSS selectors for listing-page extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Category marker; the first match outside any product block wins.
    pub category: String,
    /// One product block per listed item.
    pub product: String,
    /// Name marker, scoped to a product block.
    pub name: String,
    /// Price marker, scoped to a product block.
    pub price: String,
    /// Next-page navigation link; no match ends the run.
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            category: r#"span[itemprop="name"]"#.to_string(),
            product: "article.l-product".to_string(),
            name: r#"span[itemprop="name"]"#.to_string(),
            price: r#"span[itemprop="price"]"#.to_string(),
            next_page: "#navigation_2_next_page[href]".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Pause between a completed run and the next scheduled one.
    pub interval_hours: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_hours: 12 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, also write daily-rolled log files into this directory.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("PRICEWATCH_CONFIG").unwrap_or_else(|_| "pricewatch.toml".to_string());

        let config = Config::builder()
            .add_source(File::new(&path, FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("PRICEWATCH").separator("__"))
            .build()
            .context("failed to assemble configuration sources")?;

        config.try_deserialize().context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_section() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.schedule.interval_hours, 12);
        assert_eq!(config.crawler.selectors.product, "article.l-product");
        assert!(config.crawler.start_url.starts_with("https://www.maxidom.ru"));
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn deserializes_partial_toml_over_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(
                r#"
                [server]
                port = 9000

                [crawler]
                max_pages = 5
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.crawler.max_pages, 5);
        assert_eq!(config.crawler.request_delay_ms, 500);
    }
}
