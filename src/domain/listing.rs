// src/domain/listing.rs

use crate::domain::slug_enum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

slug_enum! {
    pub enum PropertyType {
        Apartment => "apartment",
        House => "house",
        Studio => "studio",
        Townhouse => "townhouse",
        Duplex => "duplex",
        Other => "other",
    }
}

slug_enum! {
    pub enum ListingStatus {
        Available => "available",
        Pending => "pending",
        Sold => "sold",
        OffMarket => "off-market",
    }
}

slug_enum! {
    /// Housing-assistance eligibility tag attached by the listing source.
    pub enum EligibilityCategory {
        Section8 => "section-8",
        LowIncome => "low-income",
        Senior => "senior",
        Veteran => "veteran",
        Disability => "disability",
    }
}

slug_enum! {
    pub enum IncomeProgram {
        Subsidized => "subsidized",
        IncomeRestricted => "income-restricted",
        MarketRate => "market-rate",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Free-text address as advertised.
    pub address: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// A housing unit being advertised. Owned by the listing store; the search
/// engine only ever reads snapshots of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub title: String,
    pub location: Location,
    /// Whole currency units, monthly or total depending on the listing.
    pub price: u64,
    pub bedroom_count: u32,
    pub property_type: PropertyType,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    pub status: ListingStatus,
    #[serde(default)]
    pub eligibility: Option<EligibilityCategory>,
    #[serde(default)]
    pub income_program: Option<IncomeProgram>,
}

impl Listing {
    /// An available, coordinate-less apartment with no tags. Callers fill in
    /// the rest with the `with_*` methods.
    pub fn new(id: u64, title: impl Into<String>, address: impl Into<String>, price: u64) -> Self {
        Self {
            id,
            title: title.into(),
            location: Location {
                address: address.into(),
                coordinates: None,
            },
            price,
            bedroom_count: 0,
            property_type: PropertyType::Apartment,
            amenities: BTreeSet::new(),
            status: ListingStatus::Available,
            eligibility: None,
            income_program: None,
        }
    }

    pub fn with_bedrooms(mut self, count: u32) -> Self {
        self.bedroom_count = count;
        self
    }

    pub fn with_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    pub fn with_status(mut self, status: ListingStatus) -> Self {
        self.status = status;
        self
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location.coordinates = Some(Coordinates::new(lat, lng));
        self
    }

    pub fn with_amenities<I, S>(mut self, amenities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.amenities = amenities
            .into_iter()
            .map(|a| normalize_amenity(a.as_ref()))
            .filter(|a| !a.is_empty())
            .collect();
        self
    }

    pub fn with_eligibility(mut self, eligibility: EligibilityCategory) -> Self {
        self.eligibility = Some(eligibility);
        self
    }

    pub fn with_income_program(mut self, program: IncomeProgram) -> Self {
        self.income_program = Some(program);
        self
    }

    pub fn has_amenity(&self, amenity: &str) -> bool {
        self.amenities.contains(amenity)
    }
}

/// Amenity names are compared trimmed and lowercased everywhere.
pub fn normalize_amenity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_parses_case_insensitively() {
        assert_eq!(PropertyType::parse("Apartment"), Some(PropertyType::Apartment));
        assert_eq!(PropertyType::parse(" TOWNHOUSE "), Some(PropertyType::Townhouse));
        assert_eq!(PropertyType::parse("castle"), None);
    }

    #[test]
    fn slugs_match_wire_values() {
        assert_eq!(ListingStatus::OffMarket.as_str(), "off-market");
        assert_eq!(EligibilityCategory::Section8.to_string(), "section-8");
        assert_eq!(
            IncomeProgram::parse("income-restricted"),
            Some(IncomeProgram::IncomeRestricted)
        );
    }

    #[test]
    fn amenities_are_normalized_on_construction() {
        let listing = Listing::new(1, "Loft", "Kilimani", 30_000)
            .with_amenities([" WiFi", "Parking ", ""]);

        assert!(listing.has_amenity("wifi"));
        assert!(listing.has_amenity("parking"));
        assert_eq!(listing.amenities.len(), 2);
    }

    #[test]
    fn listing_serializes_with_slug_enums() {
        let listing = Listing::new(7, "Duplex", "Kileleshwa", 120_000)
            .with_type(PropertyType::Duplex)
            .with_status(ListingStatus::OffMarket);

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["property_type"], "duplex");
        assert_eq!(json["status"], "off-market");

        let back: Listing = serde_json::from_value(json).unwrap();
        assert_eq!(back, listing);
    }
}
