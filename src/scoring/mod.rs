pub mod category;
pub mod config;
pub mod engine;
pub mod rules;
pub mod validation;

pub use category::{classify, Category, Classification, SCORE_MAX, SCORE_MIN};
pub use config::{ScoringConfig, DEFAULT_BASELINE};
pub use engine::{AnalysisResult, RuleContribution, ScoreBreakdown, ScoreResult, ScoringEngine};
pub use rules::{Preset, Rule, RuleGroup, RuleSet};
pub use validation::validate_scoring;

/// Score `text` with the default (extended) rule table.
pub fn score(text: &str) -> f64 {
    ScoringEngine::preset(Preset::default()).score(text)
}

/// Score and classify `text` with the default rule table.
pub fn analyze(text: &str) -> AnalysisResult {
    ScoringEngine::preset(Preset::default()).analyze(text)
}
