//! Catalog and order operations over a `DocumentStore`, independent of HTTP.

mod catalog;
mod orders;
pub use catalog::{sample_trees, CatalogService, SeedOutcome, TreeRecord};
pub use orders::OrderService;
