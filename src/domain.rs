//! Domain model for the product catalog
//!
//! Contains the persisted product entity, candidate records produced by
//! extraction, the store trait, and live-update event payloads.

pub mod events;
pub mod product;
pub mod repositories;

pub use events::ProductEvent;
pub use product::{CandidateProduct, Product, ProductPatch};
pub use repositories::{ProductStore, StoreError};
