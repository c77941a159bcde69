//! HTML extraction for catalog listing pages
//!
//! Turns one page's markup into a category label, an ordered list of
//! (name, price) items, and the next-page link. Extraction never fails
//! structurally: missing markup degrades to fallback sentinel values.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::infrastructure::config::SelectorConfig;

pub const NO_CATEGORY: &str = "No category";
pub const NO_NAME: &str = "No name";
pub const NO_PRICE: &str = "No price";

/// One product block's extracted fields, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedItem {
    pub name: String,
    pub price: String,
}

#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub category: String,
    pub items: Vec<ExtractedItem>,
    /// Absolute next-page URL, resolved against the current page URL.
    pub next_page: Option<String>,
}

pub struct CatalogExtractor {
    category: Selector,
    product: Selector,
    name: Selector,
    price: Selector,
    next_page: Selector,
}

impl CatalogExtractor {
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            category: parse_selector(&config.category)?,
            product: parse_selector(&config.product)?,
            name: parse_selector(&config.name)?,
            price: parse_selector(&config.price)?,
            next_page: parse_selector(&config.next_page)?,
        })
    }

    pub fn extract(&self, html: &str, page_url: &str) -> ExtractedPage {
        let document = Html::parse_document(html);

        // The category marker and the per-item name marker may share a
        // selector, so the category is the first match not nested inside
        // a product block.
        let product_nodes: HashSet<_> =
            document.select(&self.product).map(|block| block.id()).collect();
        let category = document
            .select(&self.category)
            .find(|element| {
                !element
                    .ancestors()
                    .any(|ancestor| product_nodes.contains(&ancestor.id()))
            })
            .and_then(|element| element_text(&element))
            .unwrap_or_else(|| NO_CATEGORY.to_string());

        let items = document
            .select(&self.product)
            .map(|block| ExtractedItem {
                name: first_text(&block, &self.name)
                    .unwrap_or_else(|| NO_NAME.to_string()),
                price: first_text(&block, &self.price)
                    .unwrap_or_else(|| NO_PRICE.to_string()),
            })
            .collect();

        let next_page = document
            .select(&self.next_page)
            .next()
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| resolve_href(page_url, href));

        ExtractedPage {
            category,
            items,
            next_page,
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid CSS selector {selector:?}: {e}"))
}

fn element_text(element: &ElementRef) -> Option<String> {
    let text = element.text().collect::<String>().trim().to_string();
    (!text.is_empty()).then_some(text)
}

fn first_text(scope: &ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .and_then(|element| element_text(&element))
}

fn resolve_href(page_url: &str, href: &str) -> Option<String> {
    Url::parse(page_url).ok()?.join(href).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://www.maxidom.ru/catalog/svarochnoe-oborudovanie/";

    fn extractor() -> CatalogExtractor {
        CatalogExtractor::new(&SelectorConfig::default()).unwrap()
    }

    #[test]
    fn extracts_category_items_and_next_link() {
        let html = r#"
            <nav><span itemprop="name">Сварочное оборудование</span></nav>
            <article class="l-product">
                <span itemprop="name">Сварочный аппарат X2</span>
                <span itemprop="price">12 990</span>
            </article>
            <article class="l-product">
                <span itemprop="name">Маска сварщика</span>
                <span itemprop="price">1 490</span>
            </article>
            <a id="navigation_2_next_page" href="/catalog/svarochnoe-oborudovanie/?amount=30&PAGEN_2=2">→</a>
        "#;

        let page = extractor().extract(html, PAGE_URL);
        assert_eq!(page.category, "Сварочное оборудование");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "Сварочный аппарат X2");
        assert_eq!(page.items[0].price, "12 990");
        assert_eq!(page.items[1].name, "Маска сварщика");
        assert_eq!(
            page.next_page.as_deref(),
            Some("https://www.maxidom.ru/catalog/svarochnoe-oborudovanie/?amount=30&PAGEN_2=2")
        );
    }

    #[test]
    fn items_keep_document_order() {
        let html = r#"
            <article class="l-product"><span itemprop="name">first</span></article>
            <article class="l-product"><span itemprop="name">second</span></article>
            <article class="l-product"><span itemprop="name">third</span></article>
        "#;
        let page = extractor().extract(html, PAGE_URL);
        let names: Vec<_> = page.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn missing_category_marker_falls_back_for_every_item() {
        // The only name markers on this page live inside product blocks,
        // so they must not be mistaken for the category.
        let html = r#"
            <article class="l-product">
                <span itemprop="name">Дрель</span>
                <span itemprop="price">3 290</span>
            </article>
            <article class="l-product">
                <span itemprop="name">Перфоратор</span>
                <span itemprop="price">8 990</span>
            </article>
        "#;
        let page = extractor().extract(html, PAGE_URL);
        assert_eq!(page.category, NO_CATEGORY);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "Дрель");
    }

    #[test]
    fn missing_item_fields_fall_back() {
        let html = r#"
            <span itemprop="name">Инструменты</span>
            <article class="l-product">
                <span itemprop="price">990</span>
            </article>
            <article class="l-product">
                <span itemprop="name">Болгарка</span>
            </article>
            <article class="l-product"></article>
        "#;
        let page = extractor().extract(html, PAGE_URL);
        assert_eq!(page.items[0].name, NO_NAME);
        assert_eq!(page.items[0].price, "990");
        assert_eq!(page.items[1].price, NO_PRICE);
        assert_eq!(page.items[2].name, NO_NAME);
        assert_eq!(page.items[2].price, NO_PRICE);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let html = r#"
            <span itemprop="name">
                Инструменты
            </span>
            <article class="l-product">
                <span itemprop="name">  Болгарка  </span>
                <span itemprop="price"> 2 490 </span>
            </article>
        "#;
        let page = extractor().extract(html, PAGE_URL);
        assert_eq!(page.category, "Инструменты");
        assert_eq!(page.items[0].name, "Болгарка");
        assert_eq!(page.items[0].price, "2 490");
    }

    #[test]
    fn absent_next_marker_means_no_next_page() {
        let html = r#"<article class="l-product"></article>"#;
        let page = extractor().extract(html, PAGE_URL);
        assert!(page.next_page.is_none());

        // A marker without an href does not match the selector either.
        let html = r#"<a id="navigation_2_next_page">→</a>"#;
        let page = extractor().extract(html, PAGE_URL);
        assert!(page.next_page.is_none());
    }

    #[test]
    fn next_link_resolution_handles_absolute_urls() {
        let html = r#"<a id="navigation_2_next_page" href="https://other.example/p2">→</a>"#;
        let page = extractor().extract(html, PAGE_URL);
        assert_eq!(page.next_page.as_deref(), Some("https://other.example/p2"));
    }
}
