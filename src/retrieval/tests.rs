use std::sync::Arc;

use super::*;
use crate::catalog::{Catalog, CatalogProduct, CategoryIndex, LabelSet};
use crate::embedding::MockEmbedder;
use crate::expansion::MockContextExpander;
use crate::relevance::MockRelevanceJudge;
use crate::scoring::{ProductMatch, ProductMatches, ScoringError};

type MockEngine = RetrievalEngine<MockEmbedder, MockContextExpander, MockRelevanceJudge>;

fn product(id: &str, name: &str, category: &str, market: &str, embedding: [f32; 3]) -> CatalogProduct {
    CatalogProduct {
        product_id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} 1L"),
        category: LabelSet::parse(category),
        price: 4.5,
        market: LabelSet::parse(market),
        embedding: embedding.to_vec(),
    }
}

fn catalog() -> Arc<Catalog> {
    let products = vec![
        product("p1", "Whole Milk Co.", "dairy", "Mercado A|Mercado B", [0.95, 0.1, 0.3]),
        product("p2", "Condensed Milk Co.", "dairy", "Mercado A", [0.9, 0.3, 0.2]),
        product("p3", "Skim Milk Co.", "dairy", "Mercado B", [0.85, 0.2, 0.4]),
        product("b1", "French Bread", "bakery", "Mercado A", [0.1, 0.95, 0.1]),
        product("b2", "Sliced Bread", "bakery", "Mercado B", [0.2, 0.9, 0.1]),
    ];
    let categories: CategoryIndex = [
        ("dairy".to_string(), vec![1.0, 0.0, 0.0]),
        ("bakery".to_string(), vec![0.0, 1.0, 0.0]),
    ]
    .into_iter()
    .collect();
    Arc::new(Catalog::from_parts(products, categories).unwrap())
}

fn embedder() -> MockEmbedder {
    MockEmbedder::new(3)
        .with_vector("categoria: dairy", vec![1.0, 0.0, 0.0])
        .with_vector("categoria: bakery", vec![0.0, 1.0, 0.0])
        .with_vector("fresh milk", vec![1.0, 0.1, 0.3])
        .with_vector("bread", vec![0.1, 1.0, 0.1])
}

fn expander() -> MockContextExpander {
    MockContextExpander::new()
        .with_context("milk", &["whole milk"], &["dairy"], Some("fresh milk"))
        .with_context("bread", &[], &["bakery"], None)
}

fn engine(judge: MockRelevanceJudge) -> MockEngine {
    RetrievalEngine::new(
        catalog(),
        embedder(),
        expander(),
        judge,
        RetrievalConfig::default(),
    )
    .unwrap()
}

fn ids(matches: &ProductMatches) -> Vec<&str> {
    matches
        .matches
        .iter()
        .map(|m| m.product_id.as_str())
        .collect()
}

mod engine_tests {
    use super::*;

    #[tokio::test]
    async fn test_relevance_verdict_excludes_condensed_milk() {
        let engine = engine(MockRelevanceJudge::new().with_accepted("milk", &["p1"]));
        let result = engine
            .retrieve(&GroceryList::from_names(["milk"]))
            .await
            .unwrap();

        let milk = result.matches_for("milk").unwrap();
        assert_eq!(ids(milk), vec!["p1"]);
        assert_eq!(milk.matched_categories, vec!["dairy"]);
        assert!(!result.diagnostics["milk"].any_fallback());
    }

    #[tokio::test]
    async fn test_failing_judge_keeps_ranked_matches_for_that_item_only() {
        let judge = MockRelevanceJudge::new()
            .with_accepted("milk", &["p1"])
            .with_accepted("bread", &["b1"]);
        judge.fail_on("bread");
        let engine = engine(judge);

        let result = engine
            .retrieve(&GroceryList::from_names(["milk", "bread"]))
            .await
            .unwrap();

        assert_eq!(ids(result.matches_for("milk").unwrap()), vec!["p1"]);
        assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1", "b2"]);
        assert!(result.diagnostics["bread"].relevance_fallback);
        assert!(!result.diagnostics["milk"].relevance_fallback);
    }

    #[test]
    fn test_missing_snapshot_is_data_unavailable() {
        let categories = tempfile::NamedTempFile::new().unwrap();
        let err = MockEngine::from_snapshot(
            "/nonexistent/shelfmatch/catalog.json",
            categories.path(),
            embedder(),
            expander(),
            MockRelevanceJudge::new(),
            RetrievalConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RetrievalError::DataUnavailable { ref reason } if reason.contains("catalog.json")));
    }

    #[test]
    fn test_empty_snapshot_is_data_unavailable() {
        use std::io::Write;

        let mut products = tempfile::NamedTempFile::new().unwrap();
        write!(products, "[]").unwrap();
        let mut categories = tempfile::NamedTempFile::new().unwrap();
        write!(categories, r#"{{"dairy": [1.0, 0.0, 0.0]}}"#).unwrap();

        let err = MockEngine::from_snapshot(
            products.path(),
            categories.path(),
            embedder(),
            expander(),
            MockRelevanceJudge::new(),
            RetrievalConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, RetrievalError::DataUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_non_finite_query_embedding_fails_ranking() {
        let engine = engine(MockRelevanceJudge::new());
        engine.embedder().set_vector("fresh milk", vec![f32::INFINITY, 0.0, 0.0]);

        let result = engine
            .retrieve(&GroceryList::from_names(["milk", "bread"]))
            .await
            .unwrap();

        assert!(result.matches_for("milk").unwrap().is_empty());
        assert!(result.diagnostics["milk"].ranking_failed);
        assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1", "b2"]);
    }

    #[tokio::test]
    async fn test_failed_expansion_degrades_context() {
        let engine = engine(MockRelevanceJudge::new());
        engine.expander().fail_on("milk");

        let result = engine
            .retrieve(&GroceryList::from_names(["milk"]))
            .await
            .unwrap();

        let diag = &result.diagnostics["milk"];
        assert!(diag.context_degraded);
        assert!(!diag.ranking_failed);
        // No categories: the whole catalog is searched, narrowed by the name.
        assert_eq!(
            result.matches_for("milk").unwrap().matched_categories,
            Vec::<String>::new()
        );
        let found = ids(result.matches_for("milk").unwrap());
        assert!(!found.is_empty());
        assert!(found.iter().all(|id| id.starts_with('p')));
    }

    #[tokio::test]
    async fn test_panicking_expansion_is_isolated() {
        let engine = engine(MockRelevanceJudge::new().with_accepted("bread", &["b1"]));
        engine.expander().panic_on("milk");

        let result = engine
            .retrieve(&GroceryList::from_names(["milk", "bread"]))
            .await
            .unwrap();

        assert!(result.diagnostics["milk"].context_degraded);
        assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1"]);
    }

    #[tokio::test]
    async fn test_panicking_judge_keeps_ranked_matches() {
        let judge = MockRelevanceJudge::new();
        judge.panic_on("milk");
        let engine = engine(judge);

        let result = engine
            .retrieve(&GroceryList::from_names(["milk"]))
            .await
            .unwrap();

        assert_eq!(ids(result.matches_for("milk").unwrap()), vec!["p1", "p3", "p2"]);
        assert!(result.diagnostics["milk"].relevance_fallback);
    }

    #[tokio::test]
    async fn test_category_embedding_failure_searches_whole_catalog() {
        let engine = engine(MockRelevanceJudge::new());
        engine.embedder().fail_on("categoria: dairy");

        let result = engine
            .retrieve(&GroceryList::from_names(["milk"]))
            .await
            .unwrap();

        let diag = &result.diagnostics["milk"];
        assert!(diag.categories_fallback);
        assert!(!diag.ranking_failed);
        assert!(result.matches_for("milk").unwrap().matched_categories.is_empty());
        assert!(!result.matches_for("milk").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_embedding_failure_marks_not_found() {
        let engine = engine(MockRelevanceJudge::new());
        engine.embedder().fail_on("fresh milk");

        let result = engine
            .retrieve(&GroceryList::from_names(["milk", "bread"]))
            .await
            .unwrap();

        assert!(result.diagnostics["milk"].ranking_failed);
        assert!(result.matches_for("milk").unwrap().is_empty());
        assert!(!result.matches_for("bread").unwrap().is_empty());
        assert_eq!(not_found(&result), vec!["milk"]);
        assert_eq!(engine.judge().call_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_items_processed_once() {
        let engine = engine(MockRelevanceJudge::new());
        let list = GroceryList::from_names(["milk", "milk", "bread"]);

        let result = engine.retrieve(&list).await.unwrap();

        assert_eq!(result.corrected_list, list);
        assert_eq!(result.product_matches.len(), 2);
        assert_eq!(engine.judge().call_count(), 2);
    }

    #[tokio::test]
    async fn test_every_item_has_an_entry() {
        let engine = engine(MockRelevanceJudge::new().with_accepted("caviar", &[]));
        let list = GroceryList::from_names(["milk", "caviar", "bread"]);

        let result = engine.retrieve(&list).await.unwrap();

        for name in list.unique_names() {
            assert!(result.product_matches.contains_key(name));
            assert!(result.diagnostics.contains_key(name));
        }
        assert!(result.matches_for("caviar").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_list() {
        let engine = engine(MockRelevanceJudge::new());
        let result = engine.retrieve(&GroceryList::default()).await.unwrap();
        assert!(result.product_matches.is_empty());
        assert_eq!(engine.embedder().call_count(), 0);
        assert_eq!(engine.judge().call_count(), 0);
    }

    #[tokio::test]
    async fn test_retrieve_with_limits_caps_results() {
        let engine = engine(MockRelevanceJudge::new());
        let result = engine
            .retrieve_with_limits(&GroceryList::from_names(["milk"]), 1, 2)
            .await
            .unwrap();
        assert_eq!(ids(result.matches_for("milk").unwrap()), vec!["p1", "p3"]);
    }

    #[tokio::test]
    async fn test_invalid_limits_are_rejected() {
        let engine = engine(MockRelevanceJudge::new());
        let err = engine
            .retrieve_with_limits(&GroceryList::from_names(["milk"]), 5, 2)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::InvalidLimits(ScoringError::InvalidLimits { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = RetrievalConfig::default();
        config.category.fallback_threshold = 0.9;
        let err = RetrievalEngine::new(
            catalog(),
            embedder(),
            expander(),
            MockRelevanceJudge::new(),
            config,
        )
        .unwrap_err();
        assert!(matches!(err, RetrievalError::InvalidConfig { .. }));
    }
}

mod aggregate_tests {
    use super::*;
    use std::collections::BTreeMap;

    fn matched(id: &str, market: &str, similarity: f32) -> ProductMatch {
        ProductMatch {
            product_id: id.to_string(),
            name: id.to_uppercase(),
            price: 1.0,
            description: String::new(),
            category: LabelSet::parse("dairy"),
            similarity,
            market: LabelSet::parse(market),
        }
    }

    fn result() -> RetrievalResult {
        let mut product_matches = BTreeMap::new();
        product_matches.insert(
            "milk".to_string(),
            ProductMatches {
                query_item: "milk".to_string(),
                matches: vec![
                    matched("p1", "Mercado A|Mercado B", 0.9),
                    matched("p1", "Mercado A|Mercado B", 0.9),
                    matched("p3", "Mercado B", 0.8),
                ],
                matched_categories: vec!["dairy".to_string()],
            },
        );
        product_matches.insert(
            "caviar".to_string(),
            ProductMatches {
                query_item: "caviar".to_string(),
                matches: vec![],
                matched_categories: vec![],
            },
        );
        RetrievalResult {
            corrected_list: GroceryList::from_names(["milk", "caviar"]),
            product_matches,
            diagnostics: BTreeMap::new(),
        }
    }

    #[test]
    fn test_not_found_in_list_order() {
        assert_eq!(not_found(&result()), vec!["caviar"]);
    }

    #[test]
    fn test_group_by_item_dedupes_products() {
        let groups = group_by_item(&result());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].item, "milk");
        assert_eq!(groups[0].products.len(), 2);
        assert_eq!(groups[1].item, "caviar");
        assert!(groups[1].products.is_empty());
    }

    #[test]
    fn test_group_by_market_splits_market_sets() {
        let groups = group_by_market(&result());
        let markets: Vec<&str> = groups.iter().map(|g| g.market.as_str()).collect();
        assert_eq!(markets, vec!["Mercado A", "Mercado B"]);

        let a = &groups[0];
        assert_eq!(a.items.len(), 2);
        assert_eq!(a.items[0].item, "milk");
        assert_eq!(a.items[0].products.len(), 1);
        assert!(a.items[1].products.is_empty());

        let b = &groups[1];
        let b_ids: Vec<&str> = b.items[0]
            .products
            .iter()
            .map(|p| p.product_id.as_str())
            .collect();
        assert_eq!(b_ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_unique_names_preserve_first_occurrence() {
        let list = GroceryList::from_names(["b", "a", "b", "c", "a"]);
        assert_eq!(list.unique_names(), vec!["b", "a", "c"]);
    }
}
