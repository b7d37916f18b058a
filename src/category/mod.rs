//! Maps free-text category labels onto catalog categories by embedding similarity.

mod matcher;


pub use matcher::{CategoryMatch, CategoryMatcher, CategoryMatcherConfig};
