use regex::RegexBuilder;

use super::category::{SCORE_MAX, SCORE_MIN};
use super::config::ScoringConfig;
use super::rules::{Rule, RuleGroup};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(baseline) = config.baseline {
        if !baseline.is_finite() || !(SCORE_MIN..=SCORE_MAX).contains(&baseline) {
            errors.push(format!(
                "scoring.baseline: must lie within [{}, {}], got {}",
                SCORE_MIN, SCORE_MAX, baseline
            ));
        }
    }

    if let Some(ref rules) = config.rules {
        if rules.is_empty() {
            errors.push("scoring.rules: at least one rule is required".to_string());
        }
        for (i, rule) in rules.risk.iter().enumerate() {
            validate_rule(rule, RuleGroup::Risk, i, &mut errors);
        }
        for (i, rule) in rules.protective.iter().enumerate() {
            validate_rule(rule, RuleGroup::Protective, i, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rule(rule: &Rule, group: RuleGroup, index: usize, errors: &mut Vec<String>) {
    let at = format!("scoring.rules.{}[{}]", group.label(), index);

    if is_blank(&rule.pattern) {
        errors.push(format!("{}.pattern: must not be empty", at));
    } else if let Err(e) = RegexBuilder::new(&rule.pattern)
        .case_insensitive(true)
        .build()
    {
        errors.push(format!("{}.pattern: invalid '{}' - {}", at, rule.pattern, e));
    }

    if let Err(e) = check_finite(rule.weight) {
        errors.push(format!("{}.weight: {}", at, e));
    } else {
        match group {
            RuleGroup::Risk if rule.weight <= 0.0 => {
                errors.push(format!("{}.weight: risk weights must be positive", at));
            }
            RuleGroup::Protective if rule.weight >= 0.0 => {
                errors.push(format!(
                    "{}.weight: protective weights must be negative",
                    at
                ));
            }
            _ => {}
        }
    }
}

/// Whitespace-only patterns match runs of spaces, never words.
pub(super) fn is_blank(pattern: &str) -> bool {
    pattern.trim().is_empty()
}

pub(super) fn check_finite(value: f64) -> Result<(), &'static str> {
    if value.is_finite() {
        Ok(())
    } else {
        Err("must be a finite number")
    }
}
