// src/tests/router_tests/recommendations_tests.rs

use crate::tests::utils::{get, test_state};

#[test]
fn quiz_without_answers_shows_only_the_form() {
    let state = test_state("quiz_empty");
    let (status, body) = get(&state, "/recommendations");

    assert_eq!(status, 200);
    assert!(body.contains("Show my matches"));
    assert!(!body.contains("Exact matches"));
    assert!(!body.contains("Closest available"));
}

#[test]
fn affordable_answers_rank_exact_matches() {
    let state = test_state("quiz_exact");
    let (status, body) = get(&state, "/recommendations?budget=30000&location=karen");

    assert_eq!(status, 200);
    assert!(body.contains("Exact matches"));
    assert!(body.contains("tier-exact"));
    assert!(body.contains("Kilimani Studio Loft"));
    assert!(body.contains("95% match"));
    // Over budget, so filtered out entirely.
    assert!(!body.contains("Garden Cottage"));

    // Answers are echoed back into the form.
    assert!(body.contains(r#"value="30000""#));
    assert!(body.contains(r#"value="karen""#));
}

#[test]
fn impossible_budget_falls_back_to_closest_alternatives() {
    let state = test_state("quiz_fallback");
    let (status, body) = get(&state, "/recommendations?budget=10000&property_type=house");

    assert_eq!(status, 200);
    assert!(body.contains("Closest available"));
    assert!(body.contains("tier-closest"));
    assert!(!body.contains("Exact matches"));
    // The whole catalogue is ranked, never an empty page.
    assert_eq!(body.matches(r#"class="match-score""#).count(), 10);
}
