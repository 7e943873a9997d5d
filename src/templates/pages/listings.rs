// templates/pages/listings.rs

use crate::domain::{Listing, PointOfInterest};
use crate::geo::{Marker, MarkerId, MarkerSelection};
use crate::search::codec::{to_query_string, QueryMap};
use crate::templates::components::listing_card::format_price;
use crate::templates::{desktop_layout, empty_state, filter_form, listing_card};
use crate::view::View;
use maud::{html, Markup, PreEscaped};

pub struct ListingsVm<'a> {
    /// The encoded filter, without `view`, `select` or `selected`.
    pub query: &'a QueryMap,
    /// The same filter in the map dialect, for the map script's marker fetches.
    pub map_query: &'a str,
    pub view: View,
    pub listings: &'a [Listing],
    pub pois: &'a [PointOfInterest],
    pub markers: &'a [Marker],
    pub selection: &'a MarkerSelection,
    pub map_token: Option<&'a str>,
}

impl ListingsVm<'_> {
    /// Link that switches to `view`. The current selection rides along as
    /// `selected`, which is restored without moving to the map.
    fn view_href(&self, view: View) -> String {
        let mut query = self.query.clone();
        query.insert("view".into(), view.as_str().into());
        if let Some(id) = self.selection.active() {
            query.insert("selected".into(), id.to_string());
        }
        format!("/listings?{}", to_query_string(&query))
    }

    /// Link for clicking a card or marker: a fresh `select`.
    fn select_href(&self, id: MarkerId) -> String {
        let mut query = self.query.clone();
        query.insert("view".into(), self.view.as_str().into());
        query.insert("select".into(), id.to_string());
        format!("/listings?{}", to_query_string(&query))
    }

    fn marker_label(&self, marker: &Marker) -> String {
        match marker {
            Marker::Listing(m) => {
                let title = self
                    .listings
                    .iter()
                    .find(|l| l.id == m.listing_id)
                    .map(|l| l.title.as_str())
                    .unwrap_or("Listing");
                format!("{title} ({})", format_price(m.price))
            }
            Marker::Poi(m) => {
                let name = self
                    .pois
                    .iter()
                    .find(|p| p.id == m.poi_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or("Point of interest");
                format!("{name} ({})", m.category)
            }
        }
    }
}

pub fn listings_page(vm: &ListingsVm<'_>) -> Markup {
    let reset_href = format!("/listings?view={}", vm.view);

    desktop_layout(
        "Listings",
        html! {
            main class="container" data-view=(vm.view.as_str()) {
                h1 { "Listings" }

                (filter_form(vm.query, vm.view))

                nav class="view-switcher" {
                    @for view in View::ALL {
                        a href=(vm.view_href(*view))
                            class=[(*view == vm.view).then_some("active")]
                        { (view.as_str()) }
                    }
                }

                p class="result-count" {
                    (vm.listings.len()) @if vm.listings.len() == 1 { " listing" } @else { " listings" }
                }

                @if vm.listings.is_empty() {
                    (empty_state(&reset_href))
                } @else {
                    @match vm.view {
                        View::Grid => {
                            div class="listing-grid" { (cards(vm)) }
                        }
                        View::List => {
                            div class="listing-list" { (cards(vm)) }
                        }
                        View::Map => {
                            (map_panel(vm))
                            div class="listing-list" { (cards(vm)) }
                        }
                    }
                }
            }
        },
    )
}

fn cards(vm: &ListingsVm<'_>) -> Markup {
    html! {
        @for listing in vm.listings {
            @let id = MarkerId::Listing(listing.id);
            (listing_card(listing, vm.selection.is_active(id), &vm.select_href(id)))
        }
    }
}

fn map_panel(vm: &ListingsVm<'_>) -> Markup {
    // Embedded in a <script> block, so a literal "</" must not survive.
    let markers_json = serde_json::to_string(vm.markers)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/");
    let active = vm.selection.active().map(|id| id.to_string());

    html! {
        section class="map-panel" {
            div id="map"
                data-token=[vm.map_token]
                data-active=[active.as_deref()]
                data-query=(vm.map_query)
            {}
            script type="application/json" id="map-markers" { (PreEscaped(markers_json)) }

            ol class="marker-list" {
                @for marker in vm.markers {
                    @let id = marker.id();
                    li id=(format!("marker-{id}")) class=[vm.selection.is_active(id).then_some("active")] {
                        a href=(vm.select_href(id)) { (vm.marker_label(marker)) }
                    }
                }
            }
        }
    }
}
