//! Read-only product catalog and category index.
//!
//! The snapshot (products with embeddings, category embeddings) is produced offline;
//! this module only loads and validates it. See [`Catalog::load`].

pub mod error;
mod loader;
pub mod model;


pub use error::CatalogError;
pub use model::{Catalog, CatalogProduct, CategoryIndex, LabelSet};
