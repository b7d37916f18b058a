//! End-to-end retrieval tests against the mock services.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use shelfmatch::retrieval::{group_by_item, group_by_market, not_found};
use shelfmatch::{
    Catalog, GroceryList, MockRelevanceJudge, ProductMatches, RetrievalConfig, RetrievalEngine,
    RetrievalError, ServiceLimits,
};

use common::fixtures::{self, engine, engine_with};

fn ids(matches: &ProductMatches) -> Vec<&str> {
    matches
        .matches
        .iter()
        .map(|m| m.product_id.as_str())
        .collect()
}

fn id_set(matches: &ProductMatches) -> BTreeSet<&str> {
    ids(matches).into_iter().collect()
}

fn set<'a>(items: &[&'a str]) -> BTreeSet<&'a str> {
    items.iter().copied().collect()
}

#[tokio::test]
async fn test_milk_keeps_whole_milk_and_drops_condensed_milk() {
    let judge = MockRelevanceJudge::new().with_accepted("milk", &["m1", "m3"]);
    let engine = engine(judge);

    let result = engine
        .retrieve(&GroceryList::from_names(["milk"]))
        .await
        .expect("retrieval succeeds");

    let milk = result.matches_for("milk").expect("milk has an entry");
    let names: Vec<&str> = milk.matches.iter().map(|m| m.name.as_str()).collect();
    assert!(names.contains(&"Whole Milk Co."));
    assert!(!names.contains(&"Condensed Milk Co."));
    assert_eq!(id_set(milk), set(&["m1", "m3"]));
    assert_eq!(milk.matched_categories, vec!["Milk"]);
    assert!(!result.diagnostics["milk"].any_fallback());
}

#[tokio::test]
async fn test_full_list_matches_each_aisle() {
    let engine = engine(MockRelevanceJudge::new());

    let result = engine
        .retrieve(&GroceryList::from_names(["milk", "bread", "banana"]))
        .await
        .unwrap();

    assert_eq!(id_set(result.matches_for("milk").unwrap()), set(&["m1", "m2", "m3", "m4"]));
    assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1", "b2"]);
    assert_eq!(ids(result.matches_for("banana").unwrap()), vec!["f1"]);
    assert!(not_found(&result).is_empty());
}

#[tokio::test]
async fn test_relevance_failure_is_isolated_to_one_item() {
    let judge = MockRelevanceJudge::new()
        .with_accepted("milk", &["m1"])
        .with_accepted("bread", &["b2"]);
    judge.fail_on("bread");
    let engine = engine(judge);

    let result = engine
        .retrieve(&GroceryList::from_names(["milk", "bread"]))
        .await
        .unwrap();

    assert_eq!(ids(result.matches_for("milk").unwrap()), vec!["m1"]);
    assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1", "b2"]);
    assert!(result.diagnostics["bread"].relevance_fallback);
    assert!(!result.diagnostics["milk"].relevance_fallback);
}

#[tokio::test]
async fn test_judge_panic_keeps_ranked_matches() {
    let judge = MockRelevanceJudge::new().with_accepted("bread", &["b1"]);
    judge.panic_on("milk");
    let engine = engine(judge);

    let result = engine
        .retrieve(&GroceryList::from_names(["milk", "bread"]))
        .await
        .unwrap();

    assert_eq!(result.matches_for("milk").unwrap().matches.len(), 4);
    assert!(result.diagnostics["milk"].relevance_fallback);
    assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1"]);
}

#[tokio::test]
async fn test_malformed_verdict_falls_back_to_ranking() {
    let judge = MockRelevanceJudge::new();
    judge.malformed_on("bread");
    let engine = engine(judge);

    let result = engine
        .retrieve(&GroceryList::from_names(["bread"]))
        .await
        .unwrap();

    assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1", "b2"]);
    assert!(result.diagnostics["bread"].relevance_fallback);
}

#[tokio::test]
async fn test_failed_expansion_searches_with_name_only() {
    let engine = engine(MockRelevanceJudge::new());
    engine.expander().fail_on("milk");

    let result = engine
        .retrieve(&GroceryList::from_names(["milk", "bread"]))
        .await
        .unwrap();

    let milk = result.matches_for("milk").unwrap();
    assert!(milk.matched_categories.is_empty());
    assert_eq!(id_set(milk), set(&["m1", "m2", "m3", "m4"]));
    assert!(result.diagnostics["milk"].context_degraded);
    assert!(!result.diagnostics["bread"].context_degraded);
}

#[tokio::test]
async fn test_expander_panic_degrades_context() {
    let engine = engine(MockRelevanceJudge::new());
    engine.expander().panic_on("banana");

    let result = engine
        .retrieve(&GroceryList::from_names(["banana"]))
        .await
        .unwrap();

    assert!(result.diagnostics["banana"].context_degraded);
    assert_eq!(ids(result.matches_for("banana").unwrap()), vec!["f1"]);
}

#[tokio::test]
async fn test_item_embedding_failure_leaves_item_not_found() {
    let engine = engine(MockRelevanceJudge::new());
    engine.embedder().fail_on("bread roll");

    let result = engine
        .retrieve(&GroceryList::from_names(["milk", "bread"]))
        .await
        .unwrap();

    assert!(result.matches_for("bread").unwrap().is_empty());
    assert!(result.diagnostics["bread"].ranking_failed);
    assert_eq!(not_found(&result), vec!["bread"]);
    assert_eq!(result.matches_for("milk").unwrap().matches.len(), 4);
}

#[tokio::test]
async fn test_category_embedding_failure_searches_whole_catalog() {
    let engine = engine(MockRelevanceJudge::new());
    engine.embedder().fail_on("categoria: Milk");

    let result = engine
        .retrieve(&GroceryList::from_names(["milk"]))
        .await
        .unwrap();

    let milk = result.matches_for("milk").unwrap();
    assert!(result.diagnostics["milk"].categories_fallback);
    assert!(milk.matched_categories.is_empty());
    assert_eq!(id_set(milk), set(&["m1", "m2", "m3", "m4"]));
}

#[tokio::test]
async fn test_unknown_item_respects_result_bounds() {
    let engine = engine(MockRelevanceJudge::new());

    let result = engine
        .retrieve(&GroceryList::from_names(["xyzzy"]))
        .await
        .unwrap();

    let matches = &result.matches_for("xyzzy").unwrap().matches;
    let diag = &result.diagnostics["xyzzy"];
    assert!(diag.keyword_fallback);
    assert!(matches.len() >= 3);
    assert!(matches.len() <= 10);
}

#[tokio::test]
async fn test_output_invariants_hold_for_every_item() {
    let engine = engine(MockRelevanceJudge::new());
    let catalog = fixtures::catalog();

    let result = engine
        .retrieve(&GroceryList::from_names(["milk", "bread", "banana", "soap", "xyzzy"]))
        .await
        .unwrap();

    assert_eq!(result.product_matches.len(), 5);
    for (item, pm) in &result.product_matches {
        assert_eq!(&pm.query_item, item);
        assert!(pm.matches.len() <= 10);
        for m in &pm.matches {
            assert!(catalog.contains(&m.product_id), "{} not in catalog", m.product_id);
            assert!((0.0..=1.0).contains(&m.similarity));
        }
        for pair in pm.matches.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        let unique: BTreeSet<&str> = ids(pm).into_iter().collect();
        assert_eq!(unique.len(), pm.matches.len());
    }
}

#[tokio::test]
async fn test_retrieval_is_deterministic() {
    let engine = engine(MockRelevanceJudge::new().with_accepted("milk", &["m3", "m1"]));
    let list = GroceryList::from_names(["milk", "bread", "banana", "xyzzy"]);

    let first = engine.retrieve(&list).await.unwrap();
    let second = engine.retrieve(&list).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_duplicate_items_are_processed_once() {
    let judge = MockRelevanceJudge::new();
    let engine = engine(judge);
    let list = GroceryList::from_names(["milk", "bread", "milk"]);

    let result = engine.retrieve(&list).await.unwrap();

    assert_eq!(result.corrected_list, list);
    assert_eq!(result.product_matches.len(), 2);
    assert_eq!(engine.judge().call_count(), 2);
}

#[tokio::test]
async fn test_empty_list_makes_no_service_calls() {
    let engine = engine(MockRelevanceJudge::new());

    let result = engine.retrieve(&GroceryList::default()).await.unwrap();

    assert!(result.product_matches.is_empty());
    assert_eq!(engine.embedder().call_count(), 0);
    assert_eq!(engine.judge().call_count(), 0);
}

#[tokio::test]
async fn test_per_request_limits_override_config() {
    let engine = engine(MockRelevanceJudge::new());

    let result = engine
        .retrieve_with_limits(&GroceryList::from_names(["milk"]), 1, 2)
        .await
        .unwrap();
    assert_eq!(result.matches_for("milk").unwrap().matches.len(), 2);

    let err = engine
        .retrieve_with_limits(&GroceryList::from_names(["milk"]), 5, 2)
        .await
        .unwrap_err();
    assert!(matches!(err, RetrievalError::InvalidLimits(_)));
}

#[tokio::test]
async fn test_concurrency_cap_bounds_judge_calls() {
    let config = RetrievalConfig {
        limits: ServiceLimits::default().with_max_concurrency(2),
        ..RetrievalConfig::default()
    };
    let judge = MockRelevanceJudge::new();
    judge.set_default_delay(Some(Duration::from_millis(30)));
    let engine = engine_with(judge, config);

    let names: Vec<String> = (0..6).map(|i| format!("item {i}")).collect();
    let result = engine
        .retrieve(&GroceryList::from_names(names))
        .await
        .unwrap();

    assert_eq!(result.product_matches.len(), 6);
    assert_eq!(engine.judge().call_count(), 6);
    assert!(engine.judge().peak_in_flight() <= 2);
    assert!(engine.judge().peak_in_flight() >= 1);
}

#[tokio::test]
async fn test_slow_judge_times_out_and_keeps_ranking() {
    let config = RetrievalConfig {
        limits: ServiceLimits::default().with_uniform_timeout(Duration::from_millis(100)),
        ..RetrievalConfig::default()
    };
    let judge = MockRelevanceJudge::new().with_accepted("bread", &["b1"]);
    judge.delay_for("bread", Duration::from_secs(5));
    let engine = engine_with(judge, config);

    let started = std::time::Instant::now();
    let result = engine
        .retrieve(&GroceryList::from_names(["bread", "banana"]))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b1", "b2"]);
    assert!(result.diagnostics["bread"].relevance_fallback);
    assert!(!result.diagnostics["banana"].relevance_fallback);
}

#[tokio::test]
async fn test_engine_from_snapshot_files() {
    let (products, categories) = fixtures::write_catalog_files();
    let engine = RetrievalEngine::from_snapshot(
        products.path(),
        categories.path(),
        fixtures::embedder(),
        fixtures::expander(),
        MockRelevanceJudge::new().with_accepted("bread", &["b2"]),
        RetrievalConfig::default(),
    )
    .expect("snapshot loads");

    let result = engine
        .retrieve(&GroceryList::from_names(["bread"]))
        .await
        .unwrap();
    assert_eq!(ids(result.matches_for("bread").unwrap()), vec!["b2"]);
}

#[test]
fn test_unreadable_snapshot_is_data_unavailable() {
    let (products, _) = fixtures::write_catalog_files();
    let err = fixtures::MockEngine::from_snapshot(
        products.path(),
        "/nonexistent/shelfmatch/category_index.json",
        fixtures::embedder(),
        fixtures::expander(),
        MockRelevanceJudge::new(),
        RetrievalConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, RetrievalError::DataUnavailable { .. }));
}

#[tokio::test]
async fn test_engine_over_catalog_loaded_from_files() {
    let (products, categories) = fixtures::write_catalog_files();
    let catalog = Catalog::load(products.path(), categories.path()).expect("load fixture files");
    assert_eq!(catalog.len(), 9);

    let engine = RetrievalEngine::new(
        Arc::new(catalog),
        fixtures::embedder(),
        fixtures::expander(),
        MockRelevanceJudge::new().with_accepted("milk", &["m1"]),
        RetrievalConfig::default(),
    )
    .unwrap();

    let result = engine
        .retrieve(&GroceryList::from_names(["milk"]))
        .await
        .unwrap();
    assert_eq!(ids(result.matches_for("milk").unwrap()), vec!["m1"]);
}

#[tokio::test]
async fn test_grouping_views() {
    let engine = engine(
        MockRelevanceJudge::new()
            .with_accepted("milk", &["m1", "m3"])
            .with_accepted("bread", &["b2"]),
    );

    let result = engine
        .retrieve(&GroceryList::from_names(["milk", "bread", "xyzzy"]))
        .await
        .unwrap();

    let by_item = group_by_item(&result);
    let items: Vec<&str> = by_item.iter().map(|g| g.item.as_str()).collect();
    assert_eq!(items, vec!["milk", "bread", "xyzzy"]);

    let by_market = group_by_market(&result);
    let markets: Vec<&str> = by_market.iter().map(|g| g.market.as_str()).collect();
    assert!(markets.windows(2).all(|w| w[0] < w[1]));

    let mercado_b = by_market
        .iter()
        .find(|g| g.market == "Mercado B")
        .expect("Mercado B carries milk and bread");
    let milk_in_b: BTreeSet<&str> = mercado_b.items[0]
        .products
        .iter()
        .map(|p| p.product_id.as_str())
        .collect();
    assert_eq!(milk_in_b, set(&["m1", "m3"]));
    assert_eq!(mercado_b.items[1].products[0].product_id, "b2");
}
