use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::LABEL_SEPARATOR;

use super::error::CatalogError;

/// Ordered, de-duplicated set of labels, serialized pipe-delimited (`"dairy|drinks"`).
///
/// Order is kept because the first label is treated as the primary one for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Parses a pipe-delimited string; blank segments are skipped.
    pub fn parse(raw: &str) -> Self {
        Self::from_labels(raw.split(LABEL_SEPARATOR))
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || out.iter().any(|existing| existing == label) {
                continue;
            }
            out.push(label.to_string());
        }
        Self(out)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    /// Returns `true` if any label is a member of `set`.
    pub fn intersects(&self, set: &BTreeSet<String>) -> bool {
        self.0.iter().any(|l| set.contains(l))
    }

    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{LABEL_SEPARATOR}")?;
            }
            f.write_str(label)?;
        }
        Ok(())
    }
}

impl Serialize for LabelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LabelSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One vendor-agnostic product row of the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Category names this product is filed under.
    pub category: LabelSet,
    pub price: f64,
    /// Vendors carrying this product.
    pub market: LabelSet,
    pub embedding: Vec<f32>,
}

/// Catalog category name to embedding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryIndex {
    entries: BTreeMap<String, Vec<f32>>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, embedding: Vec<f32>) {
        self.entries.insert(name.into(), embedding);
    }

    pub fn get(&self, name: &str) -> Option<&[f32]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.entries
            .iter()
            .map(|(name, embedding)| (name.as_str(), embedding.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<f32>)> for CategoryIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f32>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Validated, read-only catalog: products plus the category index.
///
/// Built once at startup and shared behind an `Arc` for the life of the process.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
    by_id: HashMap<String, usize>,
    categories: CategoryIndex,
    dimension: usize,
}

impl Catalog {
    /// Validates and indexes an in-memory catalog.
    pub fn from_parts(
        products: Vec<CatalogProduct>,
        categories: CategoryIndex,
    ) -> Result<Self, CatalogError> {
        let first = products
            .first()
            .ok_or(CatalogError::Empty { what: "products" })?;
        if categories.is_empty() {
            return Err(CatalogError::Empty { what: "categories" });
        }

        let dimension = first.embedding.len();
        if dimension == 0 {
            return Err(CatalogError::ZeroDimension {
                owner: format!("product {}", first.product_id),
            });
        }

        let mut by_id = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            if product.embedding.len() != dimension {
                return Err(CatalogError::DimensionMismatch {
                    owner: format!("product {}", product.product_id),
                    expected: dimension,
                    actual: product.embedding.len(),
                });
            }
            check_finite(&product.embedding, || format!("product {}", product.product_id))?;
            if by_id.insert(product.product_id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateProduct {
                    product_id: product.product_id.clone(),
                });
            }
        }

        for (name, embedding) in categories.iter() {
            if embedding.len() != dimension {
                return Err(CatalogError::DimensionMismatch {
                    owner: format!("category {name}"),
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            check_finite(embedding, || format!("category {name}"))?;
        }

        Ok(Self {
            products,
            by_id,
            categories,
            dimension,
        })
    }

    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    pub fn product(&self, product_id: &str) -> Option<&CatalogProduct> {
        self.by_id.get(product_id).map(|&idx| &self.products[idx])
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.by_id.contains_key(product_id)
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    /// Embedding dimension shared by every product and category.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Products filed under at least one of `categories`.
    ///
    /// An empty `categories` set selects the whole catalog.
    pub fn in_categories(&self, categories: &BTreeSet<String>) -> Vec<&CatalogProduct> {
        if categories.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.category.intersects(categories))
            .collect()
    }
}

fn check_finite(embedding: &[f32], owner: impl FnOnce() -> String) -> Result<(), CatalogError> {
    match embedding.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(CatalogError::NonFiniteEmbedding {
            owner: owner(),
            index,
        }),
        None => Ok(()),
    }
}
