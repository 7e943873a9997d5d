// src/tests/router_tests/listings_tests.rs

use crate::db::Database;
use crate::errors::ServerError;
use crate::recommend::ScoringConfig;
use crate::router::{handle, AppState};
use crate::tests::utils::{get, test_state};
use astra::Body;
use http::{Method, Request};
use serde_json::Value;
use std::io::Read;

fn ids(json: &Value, key: &str) -> Vec<u64> {
    json.as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item[key].as_u64())
        .collect()
}

#[test]
fn health_and_home_respond() {
    let state = test_state("health");

    assert_eq!(get(&state, "/health"), (200, "ok".to_string()));

    let (status, body) = get(&state, "/");
    assert_eq!(status, 200);
    assert!(body.contains("Find a place to live"));
    assert!(body.contains(r#"action="/listings""#));
}

#[test]
fn unknown_route_is_not_found() {
    let state = test_state("not_found");
    let req = Request::builder()
        .method(Method::GET)
        .uri("/nope")
        .body(Body::empty())
        .unwrap();

    assert!(matches!(handle(req, &state), Err(ServerError::NotFound)));
}

#[test]
fn default_search_shows_whole_catalogue_in_grid() {
    let state = test_state("default_search");
    let (status, body) = get(&state, "/listings");

    assert_eq!(status, 200);
    assert!(body.contains(r#"data-view="grid""#));
    assert!(body.contains("10 listings"));
    assert!(body.contains("listing-grid"));
}

#[test]
fn facets_narrow_the_results() {
    let state = test_state("facets");

    let (_, body) = get(&state, "/listings?type=house");
    assert!(body.contains("3 listings"));
    assert!(body.contains("Runda Villa"));
    assert!(!body.contains("Kilimani Studio Loft"));

    let (_, body) = get(&state, "/listings?price=0-30000&view=list");
    assert!(body.contains(r#"data-view="list""#));
    assert!(body.contains("3 listings"));
    assert!(body.contains("Roysambu One Bedroom"));
    assert!(!body.contains("Garden Cottage"));
}

#[test]
fn empty_results_offer_a_reset() {
    let state = test_state("empty");
    let (status, body) = get(&state, "/listings?price=0-1000&bedrooms=5");

    assert_eq!(status, 200);
    assert!(body.contains("No listings match these filters"));
    assert!(body.contains(r#"href="/listings?view=grid""#));
}

#[test]
fn malformed_facets_fall_back_to_defaults() {
    let state = test_state("malformed");
    let (status, body) = get(&state, "/listings?price=cheap&bedrooms=lots&type=castle");

    assert_eq!(status, 200);
    assert!(body.contains("10 listings"));
}

/// The view-switcher link for `view`, with attribute escaping undone.
fn view_switch_href(body: &str, view: &str) -> String {
    let nav = &body[body.find(r#"class="view-switcher""#).unwrap()..];
    let nav = &nav[..nav.find("</nav>").unwrap()];
    nav.split(r#"href=""#)
        .skip(1)
        .map(|rest| rest[..rest.find('"').unwrap()].replace("&amp;", "&"))
        .find(|href| href.contains(&format!("view={view}")))
        .unwrap_or_else(|| panic!("no {view} link in {nav}"))
}

#[test]
fn selecting_a_card_switches_to_the_map() {
    let state = test_state("select");
    let (status, body) = get(&state, "/listings?view=list&select=listing-3");

    assert_eq!(status, 200);
    assert!(body.contains(r#"data-view="map""#));
    assert!(body.contains(r#"id="map-markers""#));
    assert!(body.contains("listing-card active"));
    assert!(body.contains(r#"data-active="listing-3""#));
    assert!(body.contains(r#""kind":"poi""#));
    // Karen Bungalow has no coordinates, so no pin.
    assert!(!body.contains(r#""listing_id":9"#));
}

#[test]
fn view_switch_after_selection_leaves_the_map() {
    let state = test_state("select_then_grid");
    let (_, body) = get(&state, "/listings?view=map&select=listing-1&type=house");
    assert!(body.contains(r#"data-view="map""#));

    let grid = view_switch_href(&body, "grid");
    assert!(grid.contains("selected=listing-1"));
    assert!(!grid.contains("select="));
    assert!(grid.contains("type=house"));

    let (status, body) = get(&state, &grid);
    assert_eq!(status, 200);
    assert!(body.contains(r#"data-view="grid""#));
    assert!(!body.contains(r#"id="map-markers""#));
    // The selection is still highlighted in the grid.
    assert!(body.contains("listing-card active"));

    let (_, body) = get(&state, &view_switch_href(&body, "list"));
    assert!(body.contains(r#"data-view="list""#));
}

#[test]
fn map_panel_carries_map_dialect_query() {
    let state = test_state("map_query");
    let (_, body) = get(&state, "/listings?view=map&price=0-30000");

    assert!(body.contains(r#"data-query="maxPrice=30000&amp;minPrice=0""#));
}

#[test]
fn listings_api_returns_filtered_json() {
    let state = test_state("api_listings");
    let (status, body) = get(&state, "/api/listings?type=studio");

    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(ids(&json, "id"), vec![2]);
}

#[test]
fn markers_api_reads_map_dialect_and_poi_filter() {
    let state = test_state("api_markers");
    let (status, body) = get(&state, "/api/markers?minPrice=0&maxPrice=30000&poi=park");

    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(ids(&json, "listing_id"), vec![2, 8, 10]);
    assert_eq!(ids(&json, "poi_id"), vec![6, 7]);
    assert_eq!(json[4]["category"], "park");
}

#[test]
fn store_failure_renders_retry_page() {
    let missing = std::env::temp_dir()
        .join("homefinder_missing_dir")
        .join("nested")
        .join("db.sqlite");
    let state = AppState::new(
        Database::new(missing.to_string_lossy().into_owned()),
        ScoringConfig::default(),
    );

    let req = Request::builder()
        .method(Method::GET)
        .uri("/listings?type=house")
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &state).expect("store failures render a page");
    assert_eq!(resp.status(), 503);

    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    assert!(body.contains("Try again"));
    assert!(body.contains(r#"href="/listings?type=house""#));
}
