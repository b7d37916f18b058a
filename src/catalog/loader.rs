use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use super::error::CatalogError;
use super::model::{Catalog, CatalogProduct, CategoryIndex};

impl Catalog {
    /// Loads the product snapshot and category index produced by the offline job.
    ///
    /// `products_path` holds a JSON array of [`CatalogProduct`]; `categories_path` holds
    /// a JSON object mapping category name to embedding.
    pub fn load(
        products_path: impl AsRef<Path>,
        categories_path: impl AsRef<Path>,
    ) -> Result<Self, CatalogError> {
        let products: Vec<CatalogProduct> = read_json(products_path.as_ref())?;
        let categories: CategoryIndex = read_json(categories_path.as_ref())?;

        let catalog = Self::from_parts(products, categories)?;

        info!(
            products = catalog.len(),
            categories = catalog.categories().len(),
            dimension = catalog.dimension(),
            "Catalog loaded"
        );

        Ok(catalog)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
