// src/domain/poi.rs

use crate::domain::listing::Coordinates;
use crate::domain::slug_enum;
use serde::{Deserialize, Serialize};

slug_enum! {
    /// Declaration order is the order POI groups are drawn on the map.
    pub enum PoiCategory {
        Shopping => "shopping",
        Health => "health",
        Education => "education",
        Park => "park",
    }
}

/// A point of interest shown for geographic context around listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: u64,
    pub name: String,
    pub category: PoiCategory,
    pub position: Coordinates,
}

impl PointOfInterest {
    pub fn new(id: u64, name: impl Into<String>, category: PoiCategory, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            position: Coordinates::new(lat, lng),
        }
    }
}
