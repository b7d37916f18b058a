use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogProduct, LabelSet};

/// A catalog product scored against one shopping-list item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: LabelSet,
    /// Cosine similarity clamped into `[0, 1]`.
    pub similarity: f32,
    pub market: LabelSet,
}

impl ProductMatch {
    pub fn from_product(product: &CatalogProduct, similarity: f32) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            category: product.category.clone(),
            similarity: similarity.clamp(0.0, 1.0),
            market: product.market.clone(),
        }
    }
}

/// Final matches for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatches {
    pub query_item: String,
    /// Non-increasing similarity.
    pub matches: Vec<ProductMatch>,
    pub matched_categories: Vec<String>,
}

impl ProductMatches {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}
