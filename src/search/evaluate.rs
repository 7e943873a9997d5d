// src/search/evaluate.rs

use crate::domain::Listing;
use crate::search::filter::FilterSpec;

/// True when `listing` satisfies every facet of `spec`. The facets are
/// independent, so the order of the checks below is only a cost ordering.
pub fn matches(listing: &Listing, spec: &FilterSpec) -> bool {
    if !spec.price_range.contains(listing.price) {
        return false;
    }
    if !spec.bedrooms.matches(listing) {
        return false;
    }
    if let Some(property_type) = spec.property_type {
        if listing.property_type != property_type {
            return false;
        }
    }
    if let Some(eligibility) = spec.eligibility {
        if listing.eligibility != Some(eligibility) {
            return false;
        }
    }
    if let Some(program) = spec.income_program {
        if listing.income_program != Some(program) {
            return false;
        }
    }
    if !spec.amenities.iter().all(|a| listing.has_amenity(a)) {
        return false;
    }
    if let Some(bounds) = spec.geo_bounds {
        // Listings without coordinates cannot be placed inside a map viewport.
        match listing.location.coordinates {
            Some(point) if bounds.contains(point) => {}
            _ => return false,
        }
    }
    true
}

/// Stable filter of `listings` by `spec`. An empty result is a normal outcome.
pub fn evaluate(listings: &[Listing], spec: &FilterSpec) -> Vec<Listing> {
    let results: Vec<Listing> = listings
        .iter()
        .filter(|listing| matches(listing, spec))
        .cloned()
        .collect();

    tracing::debug!(
        total = listings.len(),
        matched = results.len(),
        "evaluated filter"
    );

    results
}
