// src/store/sqlite.rs

use crate::db::{listings, pois, Database};
use crate::domain::{Listing, PointOfInterest};
use crate::errors::ServerError;
use crate::search::FilterSpec;
use crate::store::{ListingStore, StoreError};

/// Listing store backed by the local SQLite database. The price facet is
/// pushed down into SQL; every other facet is left to the evaluator.
#[derive(Clone, Debug)]
pub struct SqliteListingStore {
    db: Database,
}

impl SqliteListingStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl From<ServerError> for StoreError {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::DbUnavailable(msg) => StoreError::Unavailable(msg),
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl ListingStore for SqliteListingStore {
    fn fetch_listings(&self, spec: &FilterSpec) -> Result<Vec<Listing>, StoreError> {
        let price = spec.price_range.normalized();
        let listings = self
            .db
            .with_conn(|conn| listings::get_listings_in_price_range(conn, price))?;
        tracing::debug!(count = listings.len(), "fetched listings from sqlite");
        Ok(listings)
    }

    fn points_of_interest(&self) -> Result<Vec<PointOfInterest>, StoreError> {
        Ok(self.db.with_conn(|conn| pois::get_points_of_interest(conn))?)
    }
}
