//! Small four-aisle catalog with hand-placed embeddings.
//!
//! Axis 0 is milk, 1 bakery, 2 fruit, 3 cleaning.

use std::io::Write;
use std::sync::Arc;

use shelfmatch::{
    Catalog, CatalogProduct, CategoryIndex, LabelSet, MockContextExpander, MockEmbedder,
    MockRelevanceJudge, RetrievalConfig, RetrievalEngine,
};
use tempfile::NamedTempFile;

pub const DIM: usize = 4;

pub type MockEngine = RetrievalEngine<MockEmbedder, MockContextExpander, MockRelevanceJudge>;

pub fn product(
    id: &str,
    name: &str,
    category: &str,
    market: &str,
    price: f64,
    embedding: [f32; DIM],
) -> CatalogProduct {
    CatalogProduct {
        product_id: id.to_string(),
        name: name.to_string(),
        description: format!("{name}, unit"),
        category: LabelSet::parse(category),
        price,
        market: LabelSet::parse(market),
        embedding: embedding.to_vec(),
    }
}

pub fn products() -> Vec<CatalogProduct> {
    vec![
        product("m1", "Whole Milk Co.", "Milk", "Mercado A|Mercado B", 5.49, [0.98, 0.05, 0.1, 0.1]),
        product("m2", "Condensed Milk Co.", "Milk", "Mercado A", 7.99, [0.9, 0.3, 0.1, 0.2]),
        product("m3", "Skim Milk Co.", "Milk", "Mercado B", 5.19, [0.95, 0.1, 0.2, 0.1]),
        product("m4", "Powdered Milk Co.", "Milk", "Mercado C", 18.9, [0.85, 0.2, 0.3, 0.2]),
        product("b1", "French Bread", "Bakery", "Mercado A", 14.9, [0.05, 0.98, 0.1, 0.1]),
        product("b2", "Sliced Bread", "Bakery", "Mercado B|Mercado C", 9.5, [0.1, 0.95, 0.2, 0.1]),
        product("f1", "Banana Prata", "Fruit", "Mercado A", 6.99, [0.1, 0.1, 0.97, 0.1]),
        product("f2", "Gala Apple", "Fruit", "Mercado C", 11.9, [0.1, 0.1, 0.9, 0.3]),
        product("c1", "Dish Soap 500ml", "Cleaning", "Mercado B", 2.79, [0.05, 0.05, 0.1, 0.99]),
    ]
}

pub fn categories() -> CategoryIndex {
    [
        ("Milk", [1.0, 0.0, 0.0, 0.0]),
        ("Bakery", [0.0, 1.0, 0.0, 0.0]),
        ("Fruit", [0.0, 0.0, 1.0, 0.0]),
        ("Cleaning", [0.0, 0.0, 0.0, 1.0]),
    ]
    .into_iter()
    .map(|(name, v)| (name.to_string(), v.to_vec()))
    .collect()
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_parts(products(), categories()).expect("fixture catalog is valid"))
}

/// Category labels embed onto their own axis; item texts lean toward theirs.
pub fn embedder() -> MockEmbedder {
    MockEmbedder::new(DIM)
        .with_vector("categoria: Milk", vec![1.0, 0.0, 0.0, 0.0])
        .with_vector("categoria: Bakery", vec![0.0, 1.0, 0.0, 0.0])
        .with_vector("categoria: Fruit", vec![0.0, 0.0, 1.0, 0.0])
        .with_vector("fresh cow milk", vec![1.0, 0.1, 0.15, 0.1])
        .with_vector("milk", vec![1.0, 0.1, 0.15, 0.1])
        .with_vector("bread roll", vec![0.1, 1.0, 0.1, 0.1])
        .with_vector("banana", vec![0.1, 0.1, 1.0, 0.1])
}

pub fn expander() -> MockContextExpander {
    MockContextExpander::new()
        .with_context("milk", &["whole milk", "skim milk"], &["Milk"], Some("fresh cow milk"))
        .with_context("bread", &["baguette"], &["Bakery"], Some("bread roll"))
        .with_context("banana", &[], &["Fruit"], None)
}

pub fn engine(judge: MockRelevanceJudge) -> MockEngine {
    engine_with(judge, RetrievalConfig::default())
}

pub fn engine_with(judge: MockRelevanceJudge, config: RetrievalConfig) -> MockEngine {
    RetrievalEngine::new(catalog(), embedder(), expander(), judge, config)
        .expect("fixture engine config is valid")
}

/// Writes the fixture catalog as the two JSON files the loader reads.
pub fn write_catalog_files() -> (NamedTempFile, NamedTempFile) {
    let mut products_file = NamedTempFile::new().expect("create products file");
    serde_json::to_writer(&mut products_file, &products()).expect("write products");
    products_file.flush().expect("flush products");

    let mut categories_file = NamedTempFile::new().expect("create categories file");
    serde_json::to_writer(&mut categories_file, &categories()).expect("write categories");
    categories_file.flush().expect("flush categories");

    (products_file, categories_file)
}
