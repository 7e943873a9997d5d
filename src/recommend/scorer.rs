// src/recommend/scorer.rs

use crate::domain::{Listing, PropertyType};
use crate::recommend::quiz::{self, Answer, QuizAnswers, BUDGET_MAX};
use crate::search::codec::decode_bedrooms;
use crate::search::evaluate::matches;
use crate::search::filter::{BedroomFilter, FilterSpec, PriceRange};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;

/// Score bands and penalties. Only the relative order is a contract:
/// anything in the fallback band ranks below anything in the normal band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    /// Raw score before any preference is applied; also the top of the
    /// normal band.
    pub baseline: u8,
    pub normal_floor: u8,
    pub fallback_min: u8,
    pub fallback_max: u8,
    pub location_penalty: u8,
    pub amenity_penalty: u8,
    /// Charged per unmet hard filter when scoring fallback alternatives.
    pub hard_miss_penalty: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            baseline: 100,
            normal_floor: 75,
            fallback_min: 50,
            fallback_max: 70,
            location_penalty: 20,
            amenity_penalty: 10,
            hard_miss_penalty: 30,
        }
    }
}

impl ScoringConfig {
    /// Returns `self` if the bands are ordered and non-overlapping, otherwise
    /// the defaults.
    pub fn validated(self) -> Self {
        let ordered = self.baseline > 0
            && self.baseline <= 100
            && self.normal_floor <= self.baseline
            && self.fallback_min <= self.fallback_max
            && self.fallback_max < self.normal_floor;

        if ordered {
            self
        } else {
            tracing::warn!(config = ?self, "scoring bands overlap or are out of range, using defaults");
            Self::default()
        }
    }

    fn normal_score(&self, raw: u32) -> u8 {
        self.map_into(raw, self.normal_floor, self.baseline)
    }

    fn fallback_score(&self, raw: u32) -> u8 {
        self.map_into(raw, self.fallback_min, self.fallback_max)
    }

    /// Linear map of `0..=baseline` onto `lo..=hi`.
    fn map_into(&self, raw: u32, lo: u8, hi: u8) -> u8 {
        let baseline = u32::from(self.baseline.max(1));
        let raw = raw.min(baseline);
        let span = u32::from(hi.saturating_sub(lo));
        let mapped = u32::from(lo) + raw * span / baseline;
        u8::try_from(mapped).unwrap_or(hi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    /// Every returned listing satisfies all hard filters.
    Exact,
    /// Nothing satisfied the hard filters; these are the closest alternatives.
    Closest,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredListing {
    pub listing: Listing,
    pub match_score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub tier: MatchTier,
    pub listings: Vec<ScoredListing>,
}

impl Recommendations {
    pub fn is_fallback(&self) -> bool {
        self.tier == MatchTier::Closest
    }
}

/// Questionnaire answers reduced to the rules the scorer applies.
#[derive(Debug, Default)]
struct Preferences {
    budget: Option<u64>,
    property_type: Option<PropertyType>,
    bedrooms: BedroomFilter,
    locations: BTreeSet<String>,
    amenities: BTreeSet<String>,
}

impl Preferences {
    fn from_answers(answers: &QuizAnswers) -> Self {
        let mut prefs = Preferences::default();

        for (question, answer) in answers.iter() {
            match (question, answer) {
                (quiz::BUDGET, Answer::Slider(value)) => {
                    let clamped = (*value).clamp(0, BUDGET_MAX);
                    prefs.budget = u64::try_from(clamped).ok();
                }
                (quiz::PROPERTY_TYPE, Answer::Single(raw)) => {
                    prefs.property_type = PropertyType::parse(raw);
                }
                (quiz::BEDROOMS, Answer::Single(raw)) => {
                    prefs.bedrooms = decode_bedrooms(raw);
                }
                (quiz::LOCATION, Answer::Single(raw)) => {
                    prefs.locations = BTreeSet::from([raw.trim().to_lowercase()]);
                }
                (quiz::LOCATION, Answer::Multi(values)) => {
                    prefs.locations = values.iter().map(|v| v.trim().to_lowercase()).collect();
                }
                (quiz::AMENITIES, Answer::Multi(values)) => {
                    prefs.amenities = values
                        .iter()
                        .map(|v| crate::domain::normalize_amenity(v))
                        .collect();
                }
                (question, _) => {
                    tracing::debug!(question, "ignoring unknown question or answer kind");
                }
            }
            prefs.locations.retain(|l| !l.is_empty());
            prefs.amenities.retain(|a| !a.is_empty());
        }

        prefs
    }

    /// The hard-filter answers expressed as a spec for the evaluator.
    fn hard_filter_spec(&self) -> FilterSpec {
        let price = match self.budget {
            Some(budget) => PriceRange::between(0, budget),
            None => PriceRange::UNBOUNDED,
        };
        FilterSpec::unconstrained()
            .with_price(price)
            .with_property_type(self.property_type)
            .with_bedrooms(self.bedrooms)
    }

    fn hard_misses(&self, listing: &Listing) -> u32 {
        let over_budget = self.budget.is_some_and(|budget| listing.price > budget);
        let wrong_type = self
            .property_type
            .is_some_and(|ty| listing.property_type != ty);
        let wrong_bedrooms = !self.bedrooms.matches(listing);
        u32::from(over_budget) + u32::from(wrong_type) + u32::from(wrong_bedrooms)
    }

    /// Baseline minus the soft-preference penalties, floored at zero.
    fn raw_score(&self, listing: &Listing, config: &ScoringConfig) -> u32 {
        let mut penalty = 0u32;

        if !self.locations.is_empty() {
            let address = listing.location.address.to_lowercase();
            if !self.locations.iter().any(|l| address.contains(l.as_str())) {
                penalty += u32::from(config.location_penalty);
            }
        }

        let missing = self
            .amenities
            .iter()
            .filter(|a| !listing.has_amenity(a))
            .count();
        penalty += u32::try_from(missing).unwrap_or(u32::MAX) * u32::from(config.amenity_penalty);

        u32::from(config.baseline).saturating_sub(penalty)
    }
}

/// Ranks `listings` against the questionnaire.
///
/// Hard filters (budget, property type, bedrooms) take precedence: when at
/// least one listing passes them, only those are returned and scored in the
/// normal band. When none pass, the whole collection is scored instead, with
/// an extra penalty per unmet hard filter, and mapped into the fallback band
/// so callers can tell "closest available" apart from exact matches. A
/// non-empty collection therefore always yields a non-empty ranking.
pub fn score(listings: &[Listing], answers: &QuizAnswers, config: &ScoringConfig) -> Recommendations {
    let config = config.validated();
    let prefs = Preferences::from_answers(answers);
    let hard = prefs.hard_filter_spec();

    let exact: Vec<&Listing> = listings.iter().filter(|l| matches(l, &hard)).collect();

    let (tier, mut scored) = if !exact.is_empty() || listings.is_empty() {
        let scored: Vec<ScoredListing> = exact
            .into_iter()
            .map(|listing| ScoredListing {
                match_score: config.normal_score(prefs.raw_score(listing, &config)),
                listing: listing.clone(),
            })
            .collect();
        (MatchTier::Exact, scored)
    } else {
        tracing::info!(
            candidates = listings.len(),
            "no listing passed the hard filters, ranking closest alternatives"
        );
        let scored: Vec<ScoredListing> = listings
            .iter()
            .map(|listing| {
                let miss_penalty = prefs.hard_misses(listing) * u32::from(config.hard_miss_penalty);
                let raw = prefs.raw_score(listing, &config).saturating_sub(miss_penalty);
                ScoredListing {
                    match_score: config.fallback_score(raw),
                    listing: listing.clone(),
                }
            })
            .collect();
        (MatchTier::Closest, scored)
    };

    scored.sort_by_key(|s| (Reverse(s.match_score), s.listing.id));

    Recommendations {
        tier,
        listings: scored,
    }
}
