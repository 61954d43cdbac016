use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::{debug, trace};

use super::category::{classify, Category, SCORE_MAX, SCORE_MIN};
use super::config::{ScoringConfig, DEFAULT_BASELINE};
use super::rules::{Preset, Rule, RuleGroup, RuleSet};
use super::validation::{check_finite, is_blank, validate_scoring};

static MINIMAL_ENGINE: Lazy<ScoringEngine> = Lazy::new(|| {
    ScoringEngine::new(&Preset::Minimal.rule_set(), DEFAULT_BASELINE)
        .expect("built-in minimal rules compile")
});

static EXTENDED_ENGINE: Lazy<ScoringEngine> = Lazy::new(|| {
    ScoringEngine::new(&Preset::Extended.rule_set(), DEFAULT_BASELINE)
        .expect("built-in extended rules compile")
});

#[derive(Debug, Clone, Serialize)]
pub struct RuleContribution {
    pub group: RuleGroup,
    pub pattern: String,
    pub weight: f64,
    pub matches: usize,
    pub delta: f64, // matches * weight
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub baseline: f64,
    pub raw_score: f64, // Before clamping
    pub contributions: Vec<RuleContribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub clamped: bool,
    pub breakdown: ScoreBreakdown,
}

/// Score plus its classification for one piece of text.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub score: f64,
    pub category: Category,
    pub interpretation: &'static str,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone)]
struct CompiledRule {
    group: RuleGroup,
    rule: Rule,
    regex: Regex,
}

/// Keyword-weight scorer.
///
/// Starts every text at the baseline, adds `matches * weight` for each rule,
/// and clamps the total into `[0, 25]`. Rules scan the text independently, so
/// one span can count towards several rules.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    baseline: f64,
    rules: Vec<CompiledRule>,
}

impl ScoringEngine {
    /// Build an engine from rule tables. Patterns are compiled case-insensitively.
    ///
    /// Baseline and weights must be finite so every score clamps into `[0, 25]`.
    /// Weight signs are not checked here; that is left to `validate_scoring`.
    pub fn new(rules: &RuleSet, baseline: f64) -> Result<Self> {
        if let Err(e) = check_finite(baseline) {
            bail!("Baseline {}, got {}", e, baseline);
        }
        let mut compiled = Vec::with_capacity(rules.len());
        for (group, rule) in rules.iter() {
            if is_blank(&rule.pattern) {
                bail!("{} rule has an empty pattern", group.label());
            }
            if let Err(e) = check_finite(rule.weight) {
                bail!("Weight of {} pattern '{}' {}, got {}", group.label(), rule.pattern, e, rule.weight);
            }
            let regex = RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid {} pattern '{}'", group.label(), rule.pattern))?;
            compiled.push(CompiledRule {
                group,
                rule: rule.clone(),
                regex,
            });
        }
        Ok(Self {
            baseline,
            rules: compiled,
        })
    }

    /// Build an engine from a validated scoring config.
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        if let Err(errors) = validate_scoring(config) {
            bail!("Invalid scoring config:\n  - {}", errors.join("\n  - "));
        }
        Self::new(&config.effective_rules(), config.effective_baseline())
    }

    /// Shared engine for a built-in preset, compiled on first use.
    pub fn preset(preset: Preset) -> &'static ScoringEngine {
        match preset {
            Preset::Minimal => &*MINIMAL_ENGINE,
            Preset::Extended => &*EXTENDED_ENGINE,
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Rules in evaluation order, risk group first.
    pub fn rules(&self) -> impl Iterator<Item = (RuleGroup, &Rule)> {
        self.rules.iter().map(|c| (c.group, &c.rule))
    }

    pub fn calculate_score(&self, text: &str) -> ScoreResult {
        let mut raw = self.baseline;
        let mut contributions = Vec::new();

        for compiled in &self.rules {
            let matches = compiled.regex.find_iter(text).count();
            if matches == 0 {
                continue;
            }
            let delta = matches as f64 * compiled.rule.weight;
            raw += delta;
            trace!(
                group = compiled.group.label(),
                pattern = %compiled.rule.pattern,
                matches,
                delta,
                "rule matched"
            );
            contributions.push(RuleContribution {
                group: compiled.group,
                pattern: compiled.rule.pattern.clone(),
                weight: compiled.rule.weight,
                matches,
                delta,
            });
        }

        let score = raw.clamp(SCORE_MIN, SCORE_MAX);
        debug!(
            chars = text.chars().count(),
            rules_matched = contributions.len(),
            raw_score = raw,
            score,
            "scored text"
        );

        ScoreResult {
            score,
            clamped: score != raw,
            breakdown: ScoreBreakdown {
                baseline: self.baseline,
                raw_score: raw,
                contributions,
            },
        }
    }

    /// Clamped score for `text`.
    pub fn score(&self, text: &str) -> f64 {
        self.calculate_score(text).score
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let result = self.calculate_score(text);
        let classification = classify(result.score);
        AnalysisResult {
            score: result.score,
            category: classification.category,
            interpretation: classification.interpretation,
            breakdown: result.breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extended() -> &'static ScoringEngine {
        ScoringEngine::preset(Preset::Extended)
    }

    fn minimal() -> &'static ScoringEngine {
        ScoringEngine::preset(Preset::Minimal)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_empty_text_scores_baseline() {
        assert_eq!(extended().score(""), 12.5);
        assert_eq!(minimal().score(""), 12.5);
    }

    #[test]
    fn test_neutral_text_scores_baseline() {
        assert_eq!(extended().score("The train arrived at noon."), 12.5);
    }

    #[test]
    fn test_hopeless_alone_scenario() {
        let text = "I feel hopeless and alone, no energy, can't sleep";
        let result = extended().analyze(text);
        // 12.5 + 1.5 + 0.9 + 0.7 + 0.7
        assert_close(result.score, 16.3);
        assert_eq!(result.category, Category::ModeratelySevere);
        assert_eq!(
            result.interpretation,
            "Moderately severe depression indicators detected"
        );
        assert_eq!(result.breakdown.contributions.len(), 4);
    }

    #[test]
    fn test_hopeless_alone_scenario_minimal_skips_sleep() {
        let text = "I feel hopeless and alone, no energy, can't sleep";
        assert_close(minimal().score(text), 15.6);
    }

    #[test]
    fn test_positive_scenario() {
        let text = "I am happy, grateful and energetic today";
        let result = extended().analyze(text);
        // 12.5 - 2 * 1.0 - 0.7
        assert_close(result.score, 9.8);
        assert_eq!(result.category, Category::Mild);

        let happy = &result.breakdown.contributions[0];
        assert_eq!(happy.group, RuleGroup::Protective);
        assert_eq!(happy.matches, 2);
        assert_close(happy.delta, -2.0);
    }

    #[test]
    fn test_clamps_at_upper_bound() {
        let text = "suicide ".repeat(10);
        let result = extended().calculate_score(&text);
        assert_eq!(result.score, 25.0);
        assert!(result.clamped);
        assert_close(result.breakdown.raw_score, 37.5);
    }

    #[test]
    fn test_clamps_at_lower_bound() {
        let text = "happy joyful grateful thankful hopeful excited ".repeat(5);
        let result = extended().calculate_score(&text);
        assert_eq!(result.score, 0.0);
        assert!(result.clamped);
        assert!(result.breakdown.raw_score < 0.0);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extended().score("SAD"), extended().score("sad"));
        assert_eq!(extended().score("No Energy"), extended().score("no energy"));
        assert_close(extended().score("SAD"), 13.3);
    }

    #[test]
    fn test_substring_matching() {
        // "low" inside "follow", "sleep" inside "asleep"
        assert_close(extended().score("follow"), 13.3);
        assert_close(extended().score("asleep"), 13.2);
    }

    #[test]
    fn test_rules_scan_independently() {
        // "unhappy" hits the risk rule and "happy" inside it hits the protective rule
        let result = extended().calculate_score("unhappy");
        assert_eq!(result.breakdown.contributions.len(), 2);
        assert_close(result.score, 12.5 + 0.8 - 1.0);
    }

    #[test]
    fn test_counts_every_occurrence() {
        let result = extended().calculate_score("sad sad sad");
        assert_eq!(result.breakdown.contributions[0].matches, 3);
        assert_close(result.score, 12.5 + 3.0 * 0.8);
    }

    #[test]
    fn test_alternation_matches_do_not_overlap() {
        // "lonely" is consumed by one alternation, not counted as "alone"
        let result = extended().calculate_score("lonely");
        assert_eq!(result.breakdown.contributions.len(), 1);
        assert_eq!(result.breakdown.contributions[0].matches, 1);
    }

    #[test]
    fn test_minimal_ignores_extended_rules() {
        assert_eq!(minimal().score("sleep"), 12.5);
        assert_close(extended().score("sleep"), 13.2);
        assert_eq!(minimal().score("calm family"), 12.5);
    }

    #[test]
    fn test_risk_keywords_never_decrease_score() {
        let keywords = [
            "hopeless", "sad", "tired", "lonely", "death", "guilt", "panic", "insomnia",
            "appetite", "distract",
        ];
        let mut text = String::from("Some days are fine and some are not.");
        for keyword in keywords.iter().cycle().take(40) {
            let before = extended().score(&text);
            text.push(' ');
            text.push_str(keyword);
            assert!(extended().score(&text) >= before, "adding '{}'", keyword);
        }
    }

    #[test]
    fn test_protective_keywords_never_increase_score() {
        let keywords = ["joy", "excited", "inspired", "proud", "friend", "peaceful"];
        let mut text = String::from("I was sad and tired all week.");
        for keyword in keywords.iter().cycle().take(30) {
            let before = extended().score(&text);
            text.push(' ');
            text.push_str(keyword);
            assert!(extended().score(&text) <= before, "adding '{}'", keyword);
        }
    }

    #[test]
    fn test_score_always_in_range() {
        let samples = [
            "",
            "death dying suicide end it",
            "happy happy happy happy happy happy happy happy happy happy happy happy happy",
            "Tired, anxious, can't focus, not eating, worried about weight.",
            "Looking forward to seeing family and friends, feeling calm and proud.",
        ];
        for text in samples {
            let score = extended().score(text);
            assert!((0.0..=25.0).contains(&score), "{} out of range", score);
        }
    }

    #[test]
    fn test_custom_rules_and_baseline() {
        let rules = RuleSet {
            risk: vec![Rule::new("rain", 2.0)],
            protective: vec![Rule::new("sun", -1.0)],
        };
        let engine = ScoringEngine::new(&rules, 5.0).unwrap();
        assert_eq!(engine.baseline(), 5.0);
        assert_close(engine.score("Rain, rain and a little sun"), 8.0);
        assert_eq!(engine.rules().count(), 2);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let rules = RuleSet {
            risk: vec![Rule::new("(unclosed", 1.0)],
            protective: vec![],
        };
        let err = ScoringEngine::new(&rules, 12.5).unwrap_err();
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let rules = RuleSet {
            risk: vec![Rule::new("", 1.0)],
            protective: vec![],
        };
        assert!(ScoringEngine::new(&rules, 12.5).is_err());
    }

    #[test]
    fn test_from_config_validates() {
        let config = ScoringConfig {
            baseline: Some(40.0),
            ..ScoringConfig::default()
        };
        let err = ScoringEngine::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("scoring.baseline"));
    }

    #[test]
    fn test_from_config_preset_and_baseline() {
        let config = ScoringConfig {
            preset: Some(Preset::Minimal),
            baseline: Some(0.0),
            rules: None,
        };
        let engine = ScoringEngine::from_config(&config).unwrap();
        assert_eq!(engine.score(""), 0.0);
        assert_eq!(engine.score("sleep"), 0.0);
        assert_close(engine.score("despair"), 1.5);
    }

    #[test]
    fn test_blank_pattern_rejected() {
        let rules = RuleSet {
            risk: vec![],
            protective: vec![Rule::new("  ", -1.0)],
        };
        let err = ScoringEngine::new(&rules, 12.5).unwrap_err();
        assert!(err.to_string().contains("empty pattern"));
    }

    #[test]
    fn test_non_finite_weights_rejected() {
        for weight in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let rules = RuleSet {
                risk: vec![Rule::new("a", weight)],
                protective: vec![],
            };
            let err = ScoringEngine::new(&rules, 12.5).unwrap_err();
            assert!(err.to_string().contains("finite"), "weight {}", weight);
        }

        let opposed = RuleSet {
            risk: vec![Rule::new("a", f64::INFINITY)],
            protective: vec![Rule::new("a", f64::NEG_INFINITY)],
        };
        assert!(ScoringEngine::new(&opposed, 12.5).is_err());
    }

    #[test]
    fn test_non_finite_baseline_rejected() {
        let rules = Preset::Extended.rule_set();
        for baseline in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = ScoringEngine::new(&rules, baseline).unwrap_err();
            assert!(err.to_string().contains("Baseline"), "baseline {}", baseline);
        }
    }

    #[test]
    fn test_out_of_range_baseline_still_clamps() {
        let rules = Preset::Extended.rule_set();
        let high = ScoringEngine::new(&rules, 100.0).unwrap();
        assert_eq!(high.score(""), 25.0);
        assert_close(high.score("happy"), 25.0);

        let low = ScoringEngine::new(&rules, -100.0).unwrap();
        assert_eq!(low.score("suicide"), 0.0);
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ScoringEngine>();
        assert_send_sync::<AnalysisResult>();
    }
}
