// src/search/codec.rs
//
// FilterSpec <-> flat query map. Decoding is total: anything it cannot read
// falls back to that facet's default.

use crate::domain::{normalize_amenity, EligibilityCategory, IncomeProgram, PropertyType};
use crate::search::filter::{
    BedroomFilter, FilterSpec, GeoBounds, PriceRange, OPEN_ENDED_BEDROOMS_FROM,
};
use std::collections::{BTreeMap, BTreeSet};
use url::form_urlencoded;

pub type QueryMap = BTreeMap<String, String>;

pub const KEY_PRICE: &str = "price";
pub const KEY_MIN_PRICE: &str = "minPrice";
pub const KEY_MAX_PRICE: &str = "maxPrice";
pub const KEY_BEDROOMS: &str = "bedrooms";
pub const KEY_TYPE: &str = "type";
pub const KEY_ELIGIBILITY: &str = "eligibility";
pub const KEY_INCOME: &str = "income";
pub const KEY_AMENITIES: &str = "amenities";
pub const KEY_BOUNDS: &str = "bounds";

/// Wire value meaning "no constraint" for enum facets.
const ANY: &str = "any";
/// The income facet's historical spelling of "any".
const ALL_PROGRAMS: &str = "all";

/// Which price keys `encode_with` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryDialect {
    /// `price=1000-2000` / `price=3000+`
    #[default]
    Listing,
    /// `minPrice=1000&maxPrice=2000`, used by map-scoped queries.
    Map,
}

pub fn encode(spec: &FilterSpec) -> QueryMap {
    encode_with(spec, QueryDialect::Listing)
}

/// Writes one key per non-default facet, so the default spec encodes to an
/// empty map.
pub fn encode_with(spec: &FilterSpec, dialect: QueryDialect) -> QueryMap {
    let mut query = QueryMap::new();

    if spec.price_range != PriceRange::DEFAULT {
        match dialect {
            QueryDialect::Listing => {
                query.insert(KEY_PRICE.into(), format_price(spec.price_range));
            }
            QueryDialect::Map => {
                query.insert(KEY_MIN_PRICE.into(), spec.price_range.min.to_string());
                if let Some(max) = spec.price_range.max {
                    query.insert(KEY_MAX_PRICE.into(), max.to_string());
                }
            }
        }
    }

    if let Some(bedrooms) = format_bedrooms(spec.bedrooms) {
        query.insert(KEY_BEDROOMS.into(), bedrooms);
    }
    if let Some(property_type) = spec.property_type {
        query.insert(KEY_TYPE.into(), property_type.as_str().into());
    }
    if let Some(eligibility) = spec.eligibility {
        query.insert(KEY_ELIGIBILITY.into(), eligibility.as_str().into());
    }
    if let Some(program) = spec.income_program {
        query.insert(KEY_INCOME.into(), program.as_str().into());
    }
    if !spec.amenities.is_empty() {
        let joined = spec
            .amenities
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        query.insert(KEY_AMENITIES.into(), joined);
    }
    if let Some(bounds) = spec.geo_bounds {
        query.insert(
            KEY_BOUNDS.into(),
            format!(
                "{:.6},{:.6},{:.6},{:.6}",
                bounds.south, bounds.west, bounds.north, bounds.east
            ),
        );
    }

    query
}

/// Reads a spec back from a query map. Never fails; unknown keys are ignored.
pub fn decode(query: &QueryMap) -> FilterSpec {
    let get = |key: &str| query.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    let price_range = match get(KEY_PRICE) {
        Some(raw) => parse_price(raw).unwrap_or_else(|| {
            tracing::debug!(value = raw, "ignoring malformed price facet");
            PriceRange::DEFAULT
        }),
        None => parse_map_price(get(KEY_MIN_PRICE), get(KEY_MAX_PRICE))
            .unwrap_or(PriceRange::DEFAULT),
    };

    FilterSpec {
        price_range,
        bedrooms: get(KEY_BEDROOMS).map(decode_bedrooms).unwrap_or_default(),
        property_type: get(KEY_TYPE).and_then(PropertyType::parse),
        eligibility: get(KEY_ELIGIBILITY).and_then(EligibilityCategory::parse),
        income_program: get(KEY_INCOME)
            .filter(|v| !v.eq_ignore_ascii_case(ALL_PROGRAMS))
            .and_then(IncomeProgram::parse),
        amenities: get(KEY_AMENITIES).map(parse_list).unwrap_or_default(),
        geo_bounds: get(KEY_BOUNDS).and_then(parse_bounds),
    }
}

/// Renders a query map as `a=1&b=2`, percent-encoding as needed.
pub fn to_query_string(query: &QueryMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter())
        .finish()
}

/// Parses a raw query string (with or without a leading `?`). A repeated key
/// keeps its last value.
pub fn parse_query_string(raw: &str) -> QueryMap {
    form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
        .into_owned()
        .collect()
}

/// Bedroom wire values: `any`, `studio`, `N+`, and a bare `N` which means
/// "exactly N" below the open-ended tier and "N or more" from it upward.
pub(crate) fn decode_bedrooms(raw: &str) -> BedroomFilter {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case(ANY) {
        return BedroomFilter::Any;
    }
    if raw.eq_ignore_ascii_case("studio") {
        return BedroomFilter::Studio;
    }
    if let Some(n) = raw.strip_suffix('+') {
        return n
            .trim()
            .parse()
            .map(BedroomFilter::AtLeast)
            .unwrap_or_default();
    }
    match raw.parse::<u32>() {
        Ok(n) if n >= OPEN_ENDED_BEDROOMS_FROM => BedroomFilter::AtLeast(n),
        Ok(n) => BedroomFilter::Exactly(n),
        Err(_) => BedroomFilter::Any,
    }
}

/// Comma-separated list, normalized and de-duplicated.
pub(crate) fn parse_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(normalize_amenity)
        .filter(|item| !item.is_empty())
        .collect()
}

fn format_price(range: PriceRange) -> String {
    match range.max {
        Some(max) => format!("{}-{}", range.min, max),
        None => format!("{}+", range.min),
    }
}

fn parse_price(raw: &str) -> Option<PriceRange> {
    if let Some(min) = raw.strip_suffix('+') {
        return min.trim().parse().ok().map(PriceRange::at_least);
    }
    let (min, max) = raw.split_once('-')?;
    Some(PriceRange::between(
        min.trim().parse().ok()?,
        max.trim().parse().ok()?,
    ))
}

fn parse_map_price(min: Option<&str>, max: Option<&str>) -> Option<PriceRange> {
    let min = min.and_then(|v| v.parse::<u64>().ok());
    let max = max.and_then(|v| v.parse::<u64>().ok());
    match (min, max) {
        (None, None) => None,
        (min, max) => Some(PriceRange {
            min: min.unwrap_or(0),
            max,
        }),
    }
}

fn format_bedrooms(bedrooms: BedroomFilter) -> Option<String> {
    match bedrooms {
        BedroomFilter::Any => None,
        BedroomFilter::Studio => Some("studio".into()),
        BedroomFilter::Exactly(n) => Some(n.to_string()),
        BedroomFilter::AtLeast(n) if n >= OPEN_ENDED_BEDROOMS_FROM => Some(n.to_string()),
        BedroomFilter::AtLeast(n) => Some(format!("{n}+")),
    }
}

fn parse_bounds(raw: &str) -> Option<GeoBounds> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<_>>>()?;

    let [south, west, north, east] = parts.as_slice() else {
        return None;
    };

    let lat_ok = |v: f64| (-90.0..=90.0).contains(&v);
    let lng_ok = |v: f64| (-180.0..=180.0).contains(&v);
    if !(lat_ok(*south) && lat_ok(*north) && lng_ok(*west) && lng_ok(*east)) {
        return None;
    }

    Some(GeoBounds::new(*south, *west, *north, *east).rounded())
}
