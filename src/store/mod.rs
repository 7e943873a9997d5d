// src/store/mod.rs
//
// Boundary to whatever owns the listing collection. The search engine only
// reads snapshots through this trait.

mod fixture;
mod sqlite;

pub use fixture::FixtureStore;
pub use sqlite::SqliteListingStore;

use crate::domain::{Listing, PointOfInterest};
use crate::search::FilterSpec;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached at all. Retrying may succeed.
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
    #[error("listing store query failed: {0}")]
    Query(String),
}

pub trait ListingStore: Send + Sync {
    /// Returns a snapshot of listings relevant to `spec`. A store may narrow
    /// the snapshot on some facets; callers still evaluate every facet
    /// against whatever comes back.
    fn fetch_listings(&self, spec: &FilterSpec) -> Result<Vec<Listing>, StoreError>;

    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, StoreError>;
}
