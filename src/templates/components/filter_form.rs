use crate::domain::{EligibilityCategory, PropertyType};
use crate::search::codec::{
    QueryMap, KEY_AMENITIES, KEY_BEDROOMS, KEY_ELIGIBILITY, KEY_INCOME, KEY_PRICE, KEY_TYPE,
};
use crate::view::View;
use maud::{html, Markup};

const PRICE_OPTIONS: &[(&str, &str)] = &[
    ("", "Any price"),
    ("0-30000", "Under 30,000"),
    ("30000-60000", "30,000 - 60,000"),
    ("60000-100000", "60,000 - 100,000"),
    ("100000-200000", "100,000 - 200,000"),
    ("200000+", "200,000 and up"),
];

const BEDROOM_OPTIONS: &[(&str, &str)] = &[
    ("", "Any"),
    ("studio", "Studio"),
    ("1", "1"),
    ("2", "2"),
    ("3", "3+"),
    ("4", "4+"),
];

const INCOME_OPTIONS: &[(&str, &str)] = &[
    ("", "All programs"),
    ("subsidized", "Subsidized"),
    ("income-restricted", "Income restricted"),
    ("market-rate", "Market rate"),
];

/// Facet form for `/listings`. `query` is the encoded current spec, so the
/// selected options line up with what the codec writes.
pub fn filter_form(query: &QueryMap, view: View) -> Markup {
    let current = |key: &str| query.get(key).map(String::as_str).unwrap_or("");

    html! {
        form class="filters" method="get" action="/listings" {
            input type="hidden" name="view" value=(view.as_str());

            label for="price" { "Price" }
            select name=(KEY_PRICE) id="price" {
                @for (value, label) in PRICE_OPTIONS {
                    option value=(value) selected[current(KEY_PRICE) == *value] { (label) }
                }
            }

            label for="bedrooms" { "Bedrooms" }
            select name=(KEY_BEDROOMS) id="bedrooms" {
                @for (value, label) in BEDROOM_OPTIONS {
                    option value=(value) selected[current(KEY_BEDROOMS) == *value] { (label) }
                }
            }

            label for="type" { "Type" }
            select name=(KEY_TYPE) id="type" {
                option value="" selected[current(KEY_TYPE).is_empty()] { "Any type" }
                @for ty in PropertyType::ALL {
                    option value=(ty.as_str()) selected[current(KEY_TYPE) == ty.as_str()] { (ty.as_str()) }
                }
            }

            label for="eligibility" { "Eligibility" }
            select name=(KEY_ELIGIBILITY) id="eligibility" {
                option value="" selected[current(KEY_ELIGIBILITY).is_empty()] { "Anyone" }
                @for category in EligibilityCategory::ALL {
                    option value=(category.as_str()) selected[current(KEY_ELIGIBILITY) == category.as_str()] {
                        (category.as_str())
                    }
                }
            }

            label for="income" { "Income program" }
            select name=(KEY_INCOME) id="income" {
                @for (value, label) in INCOME_OPTIONS {
                    option value=(value) selected[current(KEY_INCOME) == *value] { (label) }
                }
            }

            label for="amenities" { "Amenities" }
            input type="text" name=(KEY_AMENITIES) id="amenities"
                placeholder="parking, wifi"
                value=(current(KEY_AMENITIES));

            button type="submit" class="btn" { "Search" }
        }
    }
}
