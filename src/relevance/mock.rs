use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::catalog::LabelSet;

use super::RelevanceJudge;
use super::error::RelevanceError;
use super::types::{CandidateSummary, RelevanceRequest, RelevanceVerdict};

/// Scripted judge for tests.
///
/// Unscripted items accept every candidate.
#[derive(Default)]
pub struct MockRelevanceJudge {
    accepted: RwLock<HashMap<String, Vec<String>>>,
    failing: RwLock<HashSet<String>>,
    malformed: RwLock<HashSet<String>>,
    panicking: RwLock<HashSet<String>>,
    delays: RwLock<HashMap<String, Duration>>,
    default_delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockRelevanceJudge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accepted(self, item: impl Into<String>, ids: &[&str]) -> Self {
        self.accepted
            .write()
            .insert(item.into(), ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn fail_on(&self, item: impl Into<String>) {
        self.failing.write().insert(item.into());
    }

    /// The judge answers `item` with a payload that does not decode.
    pub fn malformed_on(&self, item: impl Into<String>) {
        self.malformed.write().insert(item.into());
    }

    pub fn panic_on(&self, item: impl Into<String>) {
        self.panicking.write().insert(item.into());
    }

    pub fn delay_for(&self, item: impl Into<String>, delay: Duration) {
        self.delays.write().insert(item.into(), delay);
    }

    /// Delay applied to every item without its own delay.
    pub fn set_default_delay(&self, delay: Option<Duration>) {
        *self.default_delay.write() = delay;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent `judge` calls observed.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn verdict_for(&self, request: &RelevanceRequest) -> Result<RelevanceVerdict, RelevanceError> {
        let item = request.query_item.as_str();

        if self.panicking.read().contains(item) {
            panic!("mock judge panic for '{item}'");
        }
        if self.failing.read().contains(item) {
            return Err(RelevanceError::Unavailable {
                reason: format!("mock judge refuses '{item}'"),
            });
        }
        if self.malformed.read().contains(item) {
            return Err(RelevanceError::MalformedVerdict {
                reason: "expected an object with a `matches` list".to_string(),
            });
        }

        Ok(match self.accepted.read().get(item) {
            Some(ids) => RelevanceVerdict::new(
                ids.iter()
                    .map(|id| {
                        request
                            .candidates
                            .iter()
                            .find(|c| &c.product_id == id)
                            .cloned()
                            .unwrap_or_else(|| CandidateSummary {
                                product_id: id.clone(),
                                name: String::new(),
                                description: String::new(),
                                category: LabelSet::default(),
                            })
                    })
                    .collect(),
            ),
            None => RelevanceVerdict::new(request.candidates.clone()),
        })
    }
}

impl RelevanceJudge for MockRelevanceJudge {
    async fn judge(&self, request: &RelevanceRequest) -> Result<RelevanceVerdict, RelevanceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);

        let delay = self
            .delays
            .read()
            .get(&request.query_item)
            .copied()
            .or(*self.default_delay.read());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.verdict_for(request)
    }
}

/// Decrements the in-flight counter when the call finishes, times out or panics.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
