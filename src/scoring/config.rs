use serde::{Deserialize, Serialize};

use super::rules::{Preset, RuleSet};

/// Default starting score before any rule applies (midpoint of the range).
pub const DEFAULT_BASELINE: f64 = 12.5;

/// Main scoring configuration.
///
/// Describes which rules an engine uses and where scoring starts. Every field is
/// optional; an empty section means the extended preset with the default
/// baseline.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   preset: minimal
///   baseline: 12.5
///   rules:
///     risk:
///       - { pattern: "hopeless|worthless", weight: 1.5 }
///     protective:
///       - { pattern: "happy|joy", weight: -1.0 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Built-in rule table to use when `rules` is absent (default: extended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,

    /// Starting score before rules are applied (default: 12.5)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,

    /// Custom rule tables; when present they replace the preset entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleSet>,
}

impl ScoringConfig {
    /// Config with the preset's rules written out, suitable as a starting point
    /// for editing.
    pub fn expanded(preset: Preset) -> Self {
        Self {
            preset: None,
            baseline: Some(DEFAULT_BASELINE),
            rules: Some(preset.rule_set()),
        }
    }

    /// Force a preset, dropping custom rules but keeping the baseline.
    pub fn with_preset(&self, preset: Preset) -> Self {
        Self {
            preset: Some(preset),
            baseline: self.baseline,
            rules: None,
        }
    }

    pub fn effective_baseline(&self) -> f64 {
        self.baseline.unwrap_or(DEFAULT_BASELINE)
    }

    pub fn effective_preset(&self) -> Preset {
        self.preset.unwrap_or_default()
    }

    /// Rules the engine will use: custom rules if given, the preset otherwise.
    pub fn effective_rules(&self) -> RuleSet {
        match &self.rules {
            Some(rules) => rules.clone(),
            None => self.effective_preset().rule_set(),
        }
    }

    /// True when the config is just a built-in preset at the default baseline.
    pub fn is_builtin(&self) -> bool {
        self.rules.is_none() && self.effective_baseline() == DEFAULT_BASELINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Rule;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.effective_baseline(), 12.5);
        assert_eq!(config.effective_preset(), Preset::Extended);
        assert_eq!(config.effective_rules(), Preset::Extended.rule_set());
        assert!(config.is_builtin());
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::expanded(Preset::Extended);
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
preset: minimal
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.preset, Some(Preset::Minimal));
        assert!(config.baseline.is_none());
        assert!(config.rules.is_none());
        assert_eq!(config.effective_rules().len(), 9);
    }

    #[test]
    fn test_full_scoring_config_parse() {
        let yaml = r#"
preset: minimal
baseline: 10
rules:
  risk:
    - pattern: "hopeless"
      weight: 2.0
  protective:
    - pattern: "calm"
      weight: -0.5
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.effective_baseline(), 10.0);
        assert!(!config.is_builtin());

        // Custom rules take precedence over the preset
        let rules = config.effective_rules();
        assert_eq!(rules.risk, vec![Rule::new("hopeless", 2.0)]);
        assert_eq!(rules.protective, vec![Rule::new("calm", -0.5)]);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_unknown_preset_rejected() {
        let result = serde_saphyr::from_str::<ScoringConfig>("preset: huge\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_with_preset_drops_custom_rules_keeps_baseline() {
        let config = ScoringConfig {
            preset: None,
            baseline: Some(8.0),
            rules: Some(RuleSet::default()),
        };
        let forced = config.with_preset(Preset::Minimal);
        assert_eq!(forced.preset, Some(Preset::Minimal));
        assert_eq!(forced.baseline, Some(8.0));
        assert!(forced.rules.is_none());
    }
}
