// src/tests/router_tests/compare_tests.rs

use crate::errors::ServerError;
use crate::router::{handle, AppState};
use crate::tests::utils::{get, get_with_cookie, request_with_cookie, test_state};
use astra::Body;
use http::{Method, Request};

/// POSTs `uri` and returns the `Cookie` header to send next time: the one the
/// server issued, or else the one that was sent.
fn post(state: &AppState, uri: &str, cookie: Option<&str>) -> String {
    let resp = request_with_cookie(state, Method::POST, uri, cookie);
    assert_eq!(resp.status().as_u16(), 302);
    assert_eq!(
        resp.headers().get("Location").and_then(|v| v.to_str().ok()),
        Some("/compare")
    );

    match resp.headers().get("Set-Cookie").and_then(|v| v.to_str().ok()) {
        Some(set_cookie) => {
            assert!(set_cookie.contains("HttpOnly"));
            set_cookie.split(';').next().unwrap().to_string()
        }
        None => cookie
            .expect("a visitor without a cookie is issued one")
            .to_string(),
    }
}

fn compare(state: &AppState, cookie: &str) -> String {
    let (status, body) = get_with_cookie(state, "/compare", Some(cookie));
    assert_eq!(status, 200);
    body
}

#[test]
fn empty_comparison_page() {
    let state = test_state("compare_empty");
    let (status, body) = get(&state, "/compare");

    assert_eq!(status, 200);
    assert!(body.contains("Nothing to compare yet"));
}

#[test]
fn add_and_remove_listings() {
    let state = test_state("compare_flow");

    let cookie = post(&state, "/compare/add?id=1", None);
    assert!(cookie.starts_with("visitor="));
    assert_eq!(post(&state, "/compare/add?id=3", Some(&cookie)), cookie);
    // Adding again is a no-op.
    post(&state, "/compare/add?id=1", Some(&cookie));

    let body = compare(&state, &cookie);
    assert!(body.contains("Garden Cottage"));
    assert!(body.contains("Westlands Apartment"));
    assert!(body.contains("(2 of 3)"));
    assert_eq!(body.matches("Remove").count(), 2);

    post(&state, "/compare/remove?id=1", Some(&cookie));
    let body = compare(&state, &cookie);
    assert!(!body.contains("Garden Cottage"));
    assert!(body.contains("Westlands Apartment"));
}

#[test]
fn fourth_listing_is_refused() {
    let state = test_state("compare_full");
    let cookie = post(&state, "/compare/add?id=1", None);
    for id in [2, 3, 4] {
        post(&state, &format!("/compare/add?id={id}"), Some(&cookie));
    }

    let body = compare(&state, &cookie);
    assert!(body.contains("The comparison list is full"));
    assert!(!body.contains("Lavington Townhouse"));
}

#[test]
fn each_visitor_has_their_own_list() {
    let state = test_state("compare_visitors");

    let first = post(&state, "/compare/add?id=1", None);
    let second = post(&state, "/compare/add?id=3", None);
    assert_ne!(first, second);

    let body = compare(&state, &first);
    assert!(body.contains("Garden Cottage"));
    assert!(!body.contains("Westlands Apartment"));

    let body = compare(&state, &second);
    assert!(body.contains("Westlands Apartment"));
    assert!(!body.contains("Garden Cottage"));

    // Without a cookie nothing is shown, and removing is harmless.
    let (_, body) = get(&state, "/compare");
    assert!(body.contains("Nothing to compare yet"));
    let resp = request_with_cookie(&state, Method::POST, "/compare/remove?id=1", None);
    assert_eq!(resp.status().as_u16(), 302);
    assert!(compare(&state, &first).contains("Garden Cottage"));
}

#[test]
fn forged_cookie_is_replaced() {
    let state = test_state("compare_forged");

    let cookie = post(&state, "/compare/add?id=1", Some("visitor=../../x"));
    assert!(cookie.starts_with("visitor="));
    assert_ne!(cookie, "visitor=../../x");
    assert!(compare(&state, &cookie).contains("Garden Cottage"));
}

#[test]
fn bad_ids_are_rejected() {
    let state = test_state("compare_bad");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/compare/add?id=abc")
        .body(Body::empty())
        .unwrap();
    assert!(matches!(handle(req, &state), Err(ServerError::BadRequest(_))));

    let req = Request::builder()
        .method(Method::POST)
        .uri("/compare/add?id=999")
        .body(Body::empty())
        .unwrap();
    assert!(matches!(handle(req, &state), Err(ServerError::NotFound)));
}
