use serde::Serialize;

use crate::domain::product::Product;

/// Change notification fanned out to connected WebSocket observers.
///
/// Only interactive create/update/delete operations emit events; the
/// scraping pipeline persists silently.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProductEvent {
    Added { product: Product },
    Updated { product: Product },
    Deleted { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn events_serialize_with_tag() {
        let event = ProductEvent::Added {
            product: Product {
                id: 7,
                category: "Tools".into(),
                name: "Welder X2".into(),
                price: "12 990".into(),
                price_minor: Some(1_299_000),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "added");
        assert_eq!(json["product"]["name"], "Welder X2");

        let json = serde_json::to_value(ProductEvent::Deleted { id: 7 }).unwrap();
        assert_eq!(json["event"], "deleted");
        assert_eq!(json["id"], 7);
    }
}
