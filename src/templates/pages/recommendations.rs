// templates/pages/recommendations.rs

use crate::domain::PropertyType;
use crate::recommend::quiz::{self, Answer, QuizAnswers};
use crate::recommend::{MatchTier, Recommendations};
use crate::templates::{desktop_layout, listing_card};
use maud::{html, Markup};

fn single<'a>(answers: &'a QuizAnswers, question: &str) -> &'a str {
    match answers.get(question) {
        Some(Answer::Single(value)) => value,
        _ => "",
    }
}

fn joined(answers: &QuizAnswers, question: &str) -> String {
    match answers.get(question) {
        Some(Answer::Multi(values)) => values.iter().cloned().collect::<Vec<_>>().join(", "),
        Some(Answer::Single(value)) => value.clone(),
        _ => String::new(),
    }
}

fn quiz_form(answers: &QuizAnswers) -> Markup {
    let budget = match answers.get(quiz::BUDGET) {
        Some(Answer::Slider(value)) => value.to_string(),
        _ => String::new(),
    };
    let property_type = single(answers, quiz::PROPERTY_TYPE);
    let bedrooms = single(answers, quiz::BEDROOMS);

    html! {
        form class="quiz" method="get" action="/recommendations" {
            fieldset {
                legend { "1. What's your budget?" }
                input type="number" name=(quiz::BUDGET) min="0" max=(quiz::BUDGET_MAX) step="1000" value=(budget);
            }
            fieldset {
                legend { "2. What kind of place?" }
                select name=(quiz::PROPERTY_TYPE) {
                    option value="any" selected[property_type.is_empty() || property_type == "any"] { "Anything" }
                    @for ty in PropertyType::ALL {
                        option value=(ty.as_str()) selected[property_type == ty.as_str()] { (ty.as_str()) }
                    }
                }
            }
            fieldset {
                legend { "3. How many bedrooms?" }
                select name=(quiz::BEDROOMS) {
                    @for (value, label) in [("any", "Any"), ("studio", "Studio"), ("1", "1"), ("2", "2"), ("3", "3+"), ("4", "4+")] {
                        option value=(value) selected[bedrooms == value] { (label) }
                    }
                }
            }
            fieldset {
                legend { "4. Where would you like to live?" }
                input type="text" name=(quiz::LOCATION) placeholder="Karen, Kilimani"
                    value=(joined(answers, quiz::LOCATION));
            }
            fieldset {
                legend { "5. Must-have amenities" }
                input type="text" name=(quiz::AMENITIES) placeholder="parking, garden"
                    value=(joined(answers, quiz::AMENITIES));
            }
            button type="submit" class="btn" { "Show my matches" }
        }
    }
}

pub fn recommendations_page(answers: &QuizAnswers, recs: Option<&Recommendations>) -> Markup {
    desktop_layout(
        "Recommendations",
        html! {
            main class="container" {
                h1 { "Find my match" }
                (quiz_form(answers))

                @if let Some(recs) = recs {
                    section class=(format!("recommendations tier-{}", tier_slug(recs.tier))) {
                        @match recs.tier {
                            MatchTier::Exact => h2 { "Exact matches" },
                            MatchTier::Closest => {
                                h2 { "Closest available" }
                                p class="notice" {
                                    "Nothing matched every answer, so these are the nearest alternatives."
                                }
                            }
                        }
                        @if recs.listings.is_empty() {
                            p { "There are no listings yet." }
                        }
                        ol class="ranked" {
                            @for scored in &recs.listings {
                                li {
                                    span class="match-score" { (scored.match_score) "% match" }
                                    (listing_card(&scored.listing, false, &format!("/listings?view=map&selected=listing-{}", scored.listing.id)))
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

fn tier_slug(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Exact => "exact",
        MatchTier::Closest => "closest",
    }
}
