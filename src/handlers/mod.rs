//! HTTP handlers for the tree catalog, order placement and diagnostics.

pub mod diagnostics;
pub mod orders;
pub mod trees;
pub use diagnostics::*;
pub use orders::*;
pub use trees::*;
