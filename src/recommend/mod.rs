pub mod quiz;
pub mod scorer;

pub use quiz::QuizAnswers;
pub use scorer::{score, MatchTier, Recommendations, ScoringConfig};
