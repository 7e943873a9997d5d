// src/geo/markers.rs

use crate::domain::{Listing, PoiCategory, PointOfInterest};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Identifies one marker across the grid, list and map renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum MarkerId {
    Listing(u64),
    Poi(u64),
}

impl MarkerId {
    /// Parses the `listing-12` / `poi-3` form used in links and DOM ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let (kind, id) = raw.trim().split_once('-')?;
        let id = id.parse().ok()?;
        match kind {
            "listing" => Some(MarkerId::Listing(id)),
            "poi" => Some(MarkerId::Poi(id)),
            _ => None,
        }
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerId::Listing(id) => write!(f, "listing-{id}"),
            MarkerId::Poi(id) => write!(f, "poi-{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingMarker {
    pub listing_id: u64,
    pub lat: f64,
    pub lng: f64,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiMarker {
    pub poi_id: u64,
    pub lat: f64,
    pub lng: f64,
    pub category: PoiCategory,
}

/// A renderable map point. Serialized with a `kind` tag for the map script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Marker {
    Listing(ListingMarker),
    Poi(PoiMarker),
}

impl Marker {
    pub fn id(&self) -> MarkerId {
        match self {
            Marker::Listing(m) => MarkerId::Listing(m.listing_id),
            Marker::Poi(m) => MarkerId::Poi(m.poi_id),
        }
    }
}

/// Merges listings and the active POI categories into one marker set.
///
/// Listings come first in their input order; a listing without coordinates
/// has nowhere to go on the map and gets no marker. POIs follow, grouped by
/// category in `PoiCategory` order and kept in input order within a group.
pub fn build_markers(
    listings: &[Listing],
    pois: &[PointOfInterest],
    active_categories: &BTreeSet<PoiCategory>,
) -> Vec<Marker> {
    let mut markers: Vec<Marker> = listings
        .iter()
        .filter_map(|listing| {
            let point = listing.location.coordinates?;
            Some(Marker::Listing(ListingMarker {
                listing_id: listing.id,
                lat: point.lat,
                lng: point.lng,
                price: listing.price,
            }))
        })
        .collect();

    let mut visible: Vec<&PointOfInterest> = pois
        .iter()
        .filter(|poi| active_categories.contains(&poi.category))
        .collect();
    // sort_by_key is stable, so input order survives inside each category.
    visible.sort_by_key(|poi| poi.category);

    markers.extend(visible.into_iter().map(|poi| {
        Marker::Poi(PoiMarker {
            poi_id: poi.id,
            lat: poi.position.lat,
            lng: poi.position.lng,
            category: poi.category,
        })
    }));

    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pois() -> Vec<PointOfInterest> {
        vec![
            PointOfInterest::new(1, "Karura Forest", PoiCategory::Park, -1.237, 36.834),
            PointOfInterest::new(2, "Nairobi Hospital", PoiCategory::Health, -1.296, 36.804),
            PointOfInterest::new(3, "Junction Mall", PoiCategory::Shopping, -1.298, 36.762),
            PointOfInterest::new(4, "Brookhouse School", PoiCategory::Education, -1.340, 36.750),
            PointOfInterest::new(5, "Sarit Centre", PoiCategory::Shopping, -1.260, 36.802),
        ]
    }

    fn listings() -> Vec<Listing> {
        vec![
            Listing::new(20, "B", "Westlands", 65_000).at(-1.267, 36.810),
            Listing::new(10, "A", "Karen", 95_000).at(-1.319, 36.707),
            Listing::new(30, "No pin", "Karen", 180_000),
        ]
    }

    #[test]
    fn listings_first_then_pois_in_category_priority() {
        let active: BTreeSet<_> = PoiCategory::ALL.iter().copied().collect();
        let ids: Vec<MarkerId> = build_markers(&listings(), &pois(), &active)
            .iter()
            .map(Marker::id)
            .collect();

        assert_eq!(
            ids,
            vec![
                MarkerId::Listing(20),
                MarkerId::Listing(10),
                MarkerId::Poi(3),
                MarkerId::Poi(5),
                MarkerId::Poi(2),
                MarkerId::Poi(4),
                MarkerId::Poi(1),
            ]
        );
    }

    #[test]
    fn inactive_categories_are_hidden() {
        let active = BTreeSet::from([PoiCategory::Park]);
        let markers = build_markers(&listings(), &pois(), &active);

        assert_eq!(markers.len(), 3);
        assert_eq!(markers.last().map(Marker::id), Some(MarkerId::Poi(1)));
    }

    #[test]
    fn build_is_deterministic() {
        let active = BTreeSet::from([PoiCategory::Shopping, PoiCategory::Health]);
        let first = build_markers(&listings(), &pois(), &active);
        let second = build_markers(&listings(), &pois(), &active);
        assert_eq!(first, second);
    }

    #[test]
    fn markers_serialize_with_kind_tag() {
        let active = BTreeSet::from([PoiCategory::Park]);
        let json = serde_json::to_value(build_markers(&listings()[..1], &pois(), &active)).unwrap();

        assert_eq!(json[0]["kind"], "listing");
        assert_eq!(json[0]["listing_id"], 20);
        assert_eq!(json[1]["kind"], "poi");
        assert_eq!(json[1]["category"], "park");
    }

    #[test]
    fn marker_ids_round_trip_through_text() {
        for id in [MarkerId::Listing(12), MarkerId::Poi(3)] {
            assert_eq!(MarkerId::parse(&id.to_string()), Some(id));
        }
        assert_eq!(MarkerId::parse("house-1"), None);
        assert_eq!(MarkerId::parse("listing-x"), None);
    }
}
