// templates/pages/compare.rs

use crate::client_state::{ComparisonList, MAX_COMPARED};
use crate::templates::components::listing_card::{bedrooms_label, format_price};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn compare_page(list: &ComparisonList) -> Markup {
    desktop_layout(
        "Compare",
        html! {
            main class="container" {
                h1 {
                    "Compare listings"
                    @if !list.is_empty() {
                        " " span class="count" { "(" (list.len()) " of " (MAX_COMPARED) ")" }
                    }
                }
                p class="lead" {
                    "Up to " (MAX_COMPARED) " listings side by side. "
                    "These are snapshots from when you added them."
                }

                @if list.is_empty() {
                    div class="empty-state" {
                        p { "Nothing to compare yet." }
                        a class="btn" href="/listings" { "Browse listings" }
                    }
                } @else {
                    table class="compare" {
                        thead {
                            tr {
                                th { "" }
                                @for item in list.items() {
                                    th { (item.listing.title) }
                                }
                            }
                        }
                        tbody {
                            tr { th { "Price" } @for item in list.items() { td { (format_price(item.listing.price)) } } }
                            tr { th { "Bedrooms" } @for item in list.items() { td { (bedrooms_label(&item.listing)) } } }
                            tr { th { "Type" } @for item in list.items() { td { (item.listing.property_type.as_str()) } } }
                            tr { th { "Address" } @for item in list.items() { td { (item.listing.location.address) } } }
                            tr {
                                th { "Amenities" }
                                @for item in list.items() {
                                    td { (item.listing.amenities.iter().cloned().collect::<Vec<_>>().join(", ")) }
                                }
                            }
                            tr {
                                th { "Added" }
                                @for item in list.items() {
                                    td { (item.added_at.format("%Y-%m-%d %H:%M").to_string()) }
                                }
                            }
                            tr {
                                th { "" }
                                @for item in list.items() {
                                    td {
                                        form method="post" action=(format!("/compare/remove?id={}", item.listing.id)) {
                                            button type="submit" class="btn-secondary" { "Remove" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    @if list.is_full() {
                        p class="notice" { "The comparison list is full. Remove a listing to add another." }
                    }
                }
            }
        },
    )
}
