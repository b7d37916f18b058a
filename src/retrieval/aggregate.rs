//! Read-only views over a [`RetrievalResult`].

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::scoring::ProductMatch;

use super::types::RetrievalResult;

/// Products found for one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemGroup {
    pub item: String,
    pub products: Vec<ProductMatch>,
}

/// Products a single market offers, per item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketGroup {
    pub market: String,
    /// Every item of the list, in list order; items the market lacks have no products.
    pub items: Vec<ItemGroup>,
}

/// Names of items with no matches, in list order.
pub fn not_found(result: &RetrievalResult) -> Vec<String> {
    result
        .corrected_list
        .unique_names()
        .into_iter()
        .filter(|name| result.matches_for(name).is_none_or(|m| m.is_empty()))
        .map(str::to_string)
        .collect()
}

/// One group per item, in list order, each product listed once.
pub fn group_by_item(result: &RetrievalResult) -> Vec<ItemGroup> {
    result
        .corrected_list
        .unique_names()
        .into_iter()
        .map(|name| ItemGroup {
            item: name.to_string(),
            products: distinct(item_matches(result, name)),
        })
        .collect()
}

/// One group per market (sorted by name) named in any match's market set.
pub fn group_by_market(result: &RetrievalResult) -> Vec<MarketGroup> {
    let names = result.corrected_list.unique_names();
    let mut markets: BTreeMap<&str, Vec<ItemGroup>> = BTreeMap::new();

    for m in result.product_matches.values().flat_map(|pm| pm.matches.iter()) {
        for market in m.market.iter() {
            markets.entry(market).or_insert_with(|| {
                names
                    .iter()
                    .map(|name| ItemGroup {
                        item: name.to_string(),
                        products: Vec::new(),
                    })
                    .collect()
            });
        }
    }

    for (position, name) in names.iter().enumerate() {
        for m in distinct(item_matches(result, name)) {
            for market in m.market.iter() {
                if let Some(groups) = markets.get_mut(market) {
                    groups[position].products.push(m.clone());
                }
            }
        }
    }

    markets
        .into_iter()
        .map(|(market, items)| MarketGroup {
            market: market.to_string(),
            items,
        })
        .collect()
}

fn item_matches<'a>(result: &'a RetrievalResult, name: &str) -> &'a [ProductMatch] {
    result
        .matches_for(name)
        .map(|m| m.matches.as_slice())
        .unwrap_or(&[])
}

fn distinct(matches: &[ProductMatch]) -> Vec<ProductMatch> {
    let mut seen = HashSet::new();
    matches
        .iter()
        .filter(|m| seen.insert(m.product_id.as_str()))
        .cloned()
        .collect()
}
