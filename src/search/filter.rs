// src/search/filter.rs

use crate::domain::{
    normalize_amenity, Coordinates, EligibilityCategory, IncomeProgram, Listing, PropertyType,
};
use std::collections::BTreeSet;

pub const DEFAULT_PRICE_MIN: u64 = 0;
pub const DEFAULT_PRICE_MAX: u64 = 1_000_000;

/// Bedroom counts from this value upward are offered as "N+" in the UI.
pub const OPEN_ENDED_BEDROOMS_FROM: u32 = 3;

/// Inclusive price window. `max: None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceRange {
    pub min: u64,
    pub max: Option<u64>,
}

impl PriceRange {
    /// The window applied when the user has not touched the price facet.
    pub const DEFAULT: PriceRange = PriceRange {
        min: DEFAULT_PRICE_MIN,
        max: Some(DEFAULT_PRICE_MAX),
    };

    pub const UNBOUNDED: PriceRange = PriceRange { min: 0, max: None };

    pub fn between(min: u64, max: u64) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn at_least(min: u64) -> Self {
        Self { min, max: None }
    }

    /// Swaps inverted bounds so `min <= max` always holds.
    pub fn normalized(self) -> Self {
        match self.max {
            Some(max) if max < self.min => Self {
                min: max,
                max: Some(self.min),
            },
            _ => self,
        }
    }

    pub fn contains(&self, price: u64) -> bool {
        let range = self.normalized();
        price >= range.min && range.max.map_or(true, |max| price <= max)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BedroomFilter {
    #[default]
    Any,
    /// Matches on property type, not bedroom count.
    Studio,
    Exactly(u32),
    AtLeast(u32),
}

impl BedroomFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        match *self {
            BedroomFilter::Any => true,
            BedroomFilter::Studio => listing.property_type == PropertyType::Studio,
            BedroomFilter::Exactly(n) => listing.bedroom_count == n,
            BedroomFilter::AtLeast(n) => listing.bedroom_count >= n,
        }
    }
}

/// Rectangle used to scope a search to the visible map area. Longitudes with
/// `west > east` describe a box crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        let (south, north) = if south <= north {
            (south, north)
        } else {
            (north, south)
        };
        Self {
            south,
            west,
            north,
            east,
        }
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        let lat_ok = point.lat >= self.south && point.lat <= self.north;
        let lng_ok = if self.west <= self.east {
            point.lng >= self.west && point.lng <= self.east
        } else {
            point.lng >= self.west || point.lng <= self.east
        };
        lat_ok && lng_ok
    }

    /// Snaps every edge to the 6 decimal digits carried in query strings.
    pub fn rounded(self) -> Self {
        let snap = |v: f64| (v * 1e6).round() / 1e6;
        Self {
            south: snap(self.south),
            west: snap(self.west),
            north: snap(self.north),
            east: snap(self.east),
        }
    }
}

/// Canonical, facet-complete description of one search.
///
/// Values are never mutated in place by callers that share them: every facet
/// change goes through a `with_*` method and yields a new spec.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    pub price_range: PriceRange,
    pub bedrooms: BedroomFilter,
    pub property_type: Option<PropertyType>,
    pub eligibility: Option<EligibilityCategory>,
    pub income_program: Option<IncomeProgram>,
    pub amenities: BTreeSet<String>,
    pub geo_bounds: Option<GeoBounds>,
}

impl FilterSpec {
    /// A spec with no constraint at all, not even the default price window.
    pub fn unconstrained() -> Self {
        Self {
            price_range: PriceRange::UNBOUNDED,
            ..Self::default()
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_price(self, price_range: PriceRange) -> Self {
        Self {
            price_range,
            ..self
        }
    }

    pub fn with_bedrooms(self, bedrooms: BedroomFilter) -> Self {
        Self { bedrooms, ..self }
    }

    pub fn with_property_type(self, property_type: Option<PropertyType>) -> Self {
        Self {
            property_type,
            ..self
        }
    }

    pub fn with_eligibility(self, eligibility: Option<EligibilityCategory>) -> Self {
        Self {
            eligibility,
            ..self
        }
    }

    pub fn with_income_program(self, income_program: Option<IncomeProgram>) -> Self {
        Self {
            income_program,
            ..self
        }
    }

    pub fn with_amenity(mut self, amenity: &str) -> Self {
        let amenity = normalize_amenity(amenity);
        if !amenity.is_empty() {
            self.amenities.insert(amenity);
        }
        self
    }

    pub fn with_geo_bounds(self, geo_bounds: Option<GeoBounds>) -> Self {
        Self { geo_bounds, ..self }
    }
}
