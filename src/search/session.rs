// src/search/session.rs
//
// State container for one user's search. Owns the current FilterSpec and the
// evaluated result set; fetches run on a worker thread and only the most
// recently issued request is allowed to land.

use crate::domain::Listing;
use crate::recommend::{score, QuizAnswers, Recommendations, ScoringConfig};
use crate::search::evaluate::evaluate;
use crate::search::filter::FilterSpec;
use crate::store::{ListingStore, StoreError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    Idle,
    Loading { seq: u64 },
    Ready,
    /// The last fetch failed; `retry()` re-issues it.
    Failed { message: String },
}

/// A fetch that has been issued but not yet applied.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    pub seq: u64,
    pub spec: FilterSpec,
}

pub struct SearchHandle {
    join: JoinHandle<bool>,
}

impl SearchHandle {
    /// Blocks until the fetch finishes. Returns whether its response was
    /// applied (false when a newer request superseded it).
    pub fn wait(self) -> bool {
        self.join.join().unwrap_or(false)
    }
}

struct SessionState {
    spec: FilterSpec,
    latest: u64,
    status: SearchStatus,
    results: Vec<Listing>,
}

struct Inner<S> {
    store: S,
    scoring: ScoringConfig,
    state: Mutex<SessionState>,
}

pub struct SearchSession<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for SearchSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: ListingStore + 'static> SearchSession<S> {
    pub fn new(store: S, scoring: ScoringConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                scoring: scoring.validated(),
                state: Mutex::new(SessionState {
                    spec: FilterSpec::default(),
                    latest: 0,
                    status: SearchStatus::Idle,
                    results: Vec::new(),
                }),
            }),
        }
    }

    /// Makes `spec` current and fetches for it in the background.
    pub fn apply_filters(&self, spec: FilterSpec) -> SearchHandle {
        let pending = self.begin(spec);
        let session = self.clone();

        let join = thread::spawn(move || {
            let outcome = session.inner.store.fetch_listings(&pending.spec);
            session.complete(pending, outcome)
        });

        SearchHandle { join }
    }

    pub fn reset_filters(&self) -> SearchHandle {
        self.apply_filters(FilterSpec::default())
    }

    /// Re-issues the current spec, typically after `SearchStatus::Failed`.
    pub fn retry(&self) -> SearchHandle {
        self.apply_filters(self.spec())
    }

    /// Stamps a new request and records it as the latest. Any response for an
    /// earlier stamp will be dropped by `complete`. Stamps are handed out
    /// under the state lock, so `latest` only ever moves forward.
    pub fn begin(&self, spec: FilterSpec) -> PendingSearch {
        let mut state = self.lock();
        let seq = state.latest + 1;
        state.spec = spec.clone();
        state.latest = seq;
        state.status = SearchStatus::Loading { seq };
        tracing::debug!(seq, "search issued");
        PendingSearch { seq, spec }
    }

    /// Applies a fetch outcome if it belongs to the latest request. Returns
    /// false when the response was stale and discarded.
    pub fn complete(
        &self,
        pending: PendingSearch,
        outcome: Result<Vec<Listing>, StoreError>,
    ) -> bool {
        let mut state = self.lock();
        if pending.seq != state.latest {
            tracing::debug!(
                seq = pending.seq,
                latest = state.latest,
                "discarding stale search response"
            );
            return false;
        }

        match outcome {
            Ok(snapshot) => {
                state.results = evaluate(&snapshot, &pending.spec);
                state.status = SearchStatus::Ready;
                tracing::info!(seq = pending.seq, results = state.results.len(), "search applied");
            }
            Err(err) => {
                tracing::warn!(seq = pending.seq, error = %err, "listing fetch failed");
                state.status = SearchStatus::Failed {
                    message: err.to_string(),
                };
            }
        }
        true
    }

    pub fn results(&self) -> Vec<Listing> {
        self.lock().results.clone()
    }

    pub fn spec(&self) -> FilterSpec {
        self.lock().spec.clone()
    }

    pub fn status(&self) -> SearchStatus {
        self.lock().status.clone()
    }

    /// Scores the store's whole catalogue, not just the filtered results.
    pub fn recommendations(&self, answers: &QuizAnswers) -> Result<Recommendations, StoreError> {
        let catalogue = self
            .inner
            .store
            .fetch_listings(&FilterSpec::unconstrained())?;
        Ok(score(&catalogue, answers, &self.inner.scoring))
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::MatchTier;
    use crate::search::filter::PriceRange;
    use crate::store::FixtureStore;
    use std::time::Duration;

    fn catalogue() -> Vec<Listing> {
        vec![
            Listing::new(1, "Karen Cottage", "Karen, Nairobi", 95_000).with_bedrooms(3),
            Listing::new(2, "Kilimani Studio", "Kilimani, Nairobi", 28_000),
            Listing::new(3, "Runda Villa", "Runda, Nairobi", 250_000).with_bedrooms(5),
        ]
    }

    fn session() -> SearchSession<FixtureStore> {
        SearchSession::new(
            FixtureStore::new(catalogue(), Vec::new()),
            ScoringConfig::default(),
        )
    }

    fn ids(listings: &[Listing]) -> Vec<u64> {
        listings.iter().map(|l| l.id).collect()
    }

    #[test]
    fn apply_filters_evaluates_fetched_snapshot() {
        let session = session();
        let spec = FilterSpec::default().with_price(PriceRange::between(0, 100_000));

        assert!(session.apply_filters(spec.clone()).wait());
        assert_eq!(ids(&session.results()), vec![1, 2]);
        assert_eq!(session.spec(), spec);
        assert_eq!(session.status(), SearchStatus::Ready);
    }

    #[test]
    fn stale_response_is_discarded() {
        let session = session();
        let first = session.begin(FilterSpec::default().with_price(PriceRange::at_least(200_000)));
        let second = session.begin(FilterSpec::default().with_price(PriceRange::between(0, 30_000)));

        assert!(session.complete(second, Ok(catalogue())));
        // The older request finishes late and must not overwrite newer results.
        assert!(!session.complete(first, Ok(catalogue())));

        assert_eq!(ids(&session.results()), vec![2]);
        assert_eq!(session.status(), SearchStatus::Ready);
    }

    #[test]
    fn concurrent_begins_leave_the_newest_stamp_current() {
        let session = session();
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let session = session.clone();
                thread::spawn(move || {
                    (0..200)
                        .map(|_| session.begin(FilterSpec::default()).seq)
                        .max()
                        .unwrap()
                })
            })
            .collect();
        let newest = workers.into_iter().map(|w| w.join().unwrap()).max().unwrap();

        assert_eq!(newest, 8 * 200);
        assert_eq!(session.status(), SearchStatus::Loading { seq: newest });
    }

    #[test]
    fn latest_background_request_wins() {
        let store = FixtureStore::new(catalogue(), Vec::new()).with_delay(Duration::from_millis(20));
        let session = SearchSession::new(store, ScoringConfig::default());

        let slow = session.apply_filters(FilterSpec::default().with_price(PriceRange::at_least(200_000)));
        let fresh = session.apply_filters(FilterSpec::default().with_price(PriceRange::between(0, 30_000)));

        assert!(!slow.wait());
        assert!(fresh.wait());
        assert_eq!(ids(&session.results()), vec![2]);
    }

    #[test]
    fn failure_is_recoverable_with_retry() {
        let store = FixtureStore::new(catalogue(), Vec::new());
        store.set_offline(true);
        let session = SearchSession::new(store, ScoringConfig::default());

        assert!(session.apply_filters(FilterSpec::default()).wait());
        assert!(matches!(session.status(), SearchStatus::Failed { .. }));

        session.inner.store.set_offline(false);
        assert!(session.retry().wait());
        assert_eq!(session.status(), SearchStatus::Ready);
        assert_eq!(ids(&session.results()), vec![1, 2, 3]);
    }

    #[test]
    fn reset_restores_default_spec() {
        let session = session();
        session
            .apply_filters(FilterSpec::default().with_price(PriceRange::between(0, 1)))
            .wait();
        assert!(session.results().is_empty());

        session.reset_filters().wait();
        assert!(session.spec().is_default());
        assert_eq!(ids(&session.results()), vec![1, 2, 3]);
    }

    #[test]
    fn recommendations_score_whole_catalogue() {
        let session = session();
        session
            .apply_filters(FilterSpec::default().with_price(PriceRange::between(0, 1)))
            .wait();

        let recs = session.recommendations(&QuizAnswers::new()).unwrap();
        assert_eq!(recs.tier, MatchTier::Exact);
        assert_eq!(recs.listings.len(), 3);
    }
}
