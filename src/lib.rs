//! Tree Store: Christmas tree catalog and order REST backend on a document store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod state;
pub mod store;

pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use routes::{app, catalog_routes, common_routes};
pub use schema::{Order, OrderItem, Product, Schema, Tree, User, ValidationError};
pub use service::{CatalogService, OrderService};
pub use state::AppState;
pub use store::{Document, DocumentId, DocumentStore, MemoryDocumentStore, PgDocumentStore};
