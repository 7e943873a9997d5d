use crate::domain::Listing;
use crate::geo::MarkerId;
use maud::{html, Markup};

/// One result card. `select_href` is the link that makes this listing the
/// active marker.
pub fn listing_card(listing: &Listing, active: bool, select_href: &str) -> Markup {
    let marker = MarkerId::Listing(listing.id);
    let class = if active {
        "listing-card active"
    } else {
        "listing-card"
    };

    html! {
        article class=(class) id=(marker.to_string()) aria-current=[active.then_some("true")] {
            h3 { a href=(select_href) { (listing.title) } }
            p class="address" { (listing.location.address) }
            p class="price" { (format_price(listing.price)) }
            ul class="facts" {
                li { (bedrooms_label(listing)) }
                li { (listing.property_type.as_str()) }
                li class="status" { (listing.status.as_str()) }
                @if let Some(eligibility) = listing.eligibility {
                    li class="tag" { (eligibility.as_str()) }
                }
                @if let Some(program) = listing.income_program {
                    li class="tag" { (program.as_str()) }
                }
            }
            @if !listing.amenities.is_empty() {
                p class="amenities" {
                    @for (i, amenity) in listing.amenities.iter().enumerate() {
                        @if i > 0 { ", " }
                        (amenity)
                    }
                }
            }
            form method="post" action=(format!("/compare/add?id={}", listing.id)) {
                button type="submit" class="btn-secondary" { "Compare" }
            }
        }
    }
}

pub fn bedrooms_label(listing: &Listing) -> String {
    match listing.bedroom_count {
        0 => "Studio / no separate bedroom".to_string(),
        1 => "1 bedroom".to_string(),
        n => format!("{n} bedrooms"),
    }
}

/// `1234567` -> `1,234,567`
pub fn format_price(price: u64) -> String {
    let digits = price.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
