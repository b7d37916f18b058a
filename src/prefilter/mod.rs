//! Lexical narrowing of a category-filtered candidate pool.

use tracing::debug;

use crate::catalog::CatalogProduct;

/// Candidates after keyword filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefiltered<'a> {
    pub candidates: Vec<&'a CatalogProduct>,
    /// No product name contained a keyword, so the input pool was kept whole.
    pub used_fallback: bool,
}

/// Keeps products whose name contains any keyword, ignoring case.
///
/// Keyword filtering narrows but never empties the pool: when nothing matches, the
/// whole input is returned with `used_fallback` set.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPrefilter;

impl KeywordPrefilter {
    pub fn new() -> Self {
        Self
    }

    pub fn apply<'a, 'k>(
        &self,
        keywords: impl IntoIterator<Item = &'k str>,
        candidates: Vec<&'a CatalogProduct>,
    ) -> Prefiltered<'a> {
        let needles: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let matched: Vec<&CatalogProduct> = candidates
            .iter()
            .copied()
            .filter(|product| {
                let name = product.name.to_lowercase();
                needles.iter().any(|needle| name.contains(needle.as_str()))
            })
            .collect();

        debug!(
            pool = candidates.len(),
            matched = matched.len(),
            "Keyword prefilter"
        );

        if matched.is_empty() {
            Prefiltered {
                candidates,
                used_fallback: true,
            }
        } else {
            Prefiltered {
                candidates: matched,
                used_fallback: false,
            }
        }
    }
}
