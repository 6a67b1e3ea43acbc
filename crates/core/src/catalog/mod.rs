//! Question catalog - the accumulated set of discovered question assets.
//!
//! Scan results are merged in by identity key and the active filter
//! view is recomputed from the full set on every request.

mod store;
mod types;

pub use store::CatalogStore;
pub use types::*;
