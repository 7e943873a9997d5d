// src/store/fixture.rs

use crate::domain::{Listing, PointOfInterest};
use crate::search::FilterSpec;
use crate::store::{ListingStore, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// In-memory store that answers after a fixed artificial delay. Stands in for
/// a remote listing service in demos and tests.
pub struct FixtureStore {
    listings: Vec<Listing>,
    pois: Vec<PointOfInterest>,
    delay: Duration,
    offline: AtomicBool,
}

impl FixtureStore {
    pub fn new(listings: Vec<Listing>, pois: Vec<PointOfInterest>) -> Self {
        Self {
            listings,
            pois,
            delay: Duration::ZERO,
            offline: AtomicBool::new(false),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// While offline every call fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn respond<T: Clone>(&self, items: &[T]) -> Result<Vec<T>, StoreError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("fixture store is offline".into()));
        }
        Ok(items.to_vec())
    }
}

impl ListingStore for FixtureStore {
    fn fetch_listings(&self, _spec: &FilterSpec) -> Result<Vec<Listing>, StoreError> {
        self.respond(&self.listings)
    }

    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, StoreError> {
        self.respond(&self.pois)
    }
}
