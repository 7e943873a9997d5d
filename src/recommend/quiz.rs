// src/recommend/quiz.rs

use crate::search::codec::{parse_list, QueryMap};
use std::collections::BTreeSet;

pub const BUDGET: &str = "budget";
pub const PROPERTY_TYPE: &str = "property_type";
pub const BEDROOMS: &str = "bedrooms";
pub const LOCATION: &str = "location";
pub const AMENITIES: &str = "amenities";

/// Upper end of the budget slider. Values outside `0..=BUDGET_MAX` are clamped.
pub const BUDGET_MAX: i64 = 10_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Single(String),
    Multi(BTreeSet<String>),
    Slider(i64),
}

impl Answer {
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Multi(values.into_iter().map(Into::into).collect())
    }
}

/// Answers collected so far, in the order the questions were first answered.
/// A partially completed questionnaire is a normal input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizAnswers {
    answers: Vec<(String, Answer)>,
}

impl QuizAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, question: &str, answer: Answer) -> Self {
        self.set(question, answer);
        self
    }

    /// Re-answering a question replaces the earlier answer in place.
    pub fn set(&mut self, question: &str, answer: Answer) {
        match self.answers.iter_mut().find(|(q, _)| q == question) {
            Some((_, existing)) => *existing = answer,
            None => self.answers.push((question.to_string(), answer)),
        }
    }

    pub fn get(&self, question: &str) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|(q, _)| q == question)
            .map(|(_, a)| a)
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.answers.iter().map(|(q, a)| (q.as_str(), a))
    }

    /// Reads the questionnaire from a submitted query string. Unknown keys
    /// and unreadable values are skipped, leaving that question unanswered.
    pub fn from_query(query: &QueryMap) -> Self {
        let mut answers = Self::new();
        let get = |key: &str| query.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(raw) = get(BUDGET) {
            match raw.parse::<i64>() {
                Ok(value) => answers.set(BUDGET, Answer::Slider(value)),
                Err(_) => tracing::debug!(value = raw, "ignoring unreadable budget answer"),
            }
        }
        for question in [PROPERTY_TYPE, BEDROOMS] {
            if let Some(raw) = get(question) {
                answers.set(question, Answer::Single(raw.to_string()));
            }
        }
        for question in [LOCATION, AMENITIES] {
            if let Some(values) = get(question).map(parse_list).filter(|v| !v.is_empty()) {
                answers.set(question, Answer::Multi(values));
            }
        }

        answers
    }
}
