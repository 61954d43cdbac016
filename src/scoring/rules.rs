use serde::{Deserialize, Serialize};

/// Which side of the scale a rule pushes the score towards.
///
/// Only used for reporting and validation; both groups are summed the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleGroup {
    Risk,
    Protective,
}

impl RuleGroup {
    pub fn label(&self) -> &'static str {
        match self {
            RuleGroup::Risk => "risk",
            RuleGroup::Protective => "protective",
        }
    }
}

/// A weighted pattern. The pattern is a regular expression matched
/// case-insensitively anywhere in the text (alternations like `sad|down`
/// count each hit once).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub pattern: String,
    pub weight: f64,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, weight: f64) -> Self {
        Self {
            pattern: pattern.into(),
            weight,
        }
    }
}

/// Ordered rule tables for both groups.
///
/// Example YAML:
/// ```yaml
/// risk:
///   - { pattern: "hopeless|worthless", weight: 1.5 }
/// protective:
///   - { pattern: "happy|joy", weight: -1.0 }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default)]
    pub risk: Vec<Rule>,

    #[serde(default)]
    pub protective: Vec<Rule>,
}

impl RuleSet {
    /// Iterate every rule with its group, risk rules first.
    pub fn iter(&self) -> impl Iterator<Item = (RuleGroup, &Rule)> {
        self.risk
            .iter()
            .map(|r| (RuleGroup::Risk, r))
            .chain(self.protective.iter().map(|r| (RuleGroup::Protective, r)))
    }

    pub fn len(&self) -> usize {
        self.risk.len() + self.protective.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Built-in rule tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Six risk rules and three protective rules
    Minimal,
    /// The full table: ten risk rules and six protective rules
    #[default]
    Extended,
}

// (pattern, weight, part of the minimal preset)
const RISK_RULES: &[(&str, f64, bool)] = &[
    ("hopeless|worthless|emptiness|despair", 1.5, true),
    ("sad|down|low|blue|unhappy", 0.8, true),
    ("tired|exhausted|fatigue|no energy", 0.7, true),
    ("alone|lonely|isolated", 0.9, true),
    ("suicide|death|dying|end it", 2.5, true),
    ("guilt|blame|fault|shame", 1.0, true),
    ("anxiety|anxious|worry|worried|panic", 0.8, false),
    ("sleep|insomnia|nightmare", 0.7, false),
    ("appetite|eating|weight", 0.6, false),
    ("concentration|focus|distract", 0.7, false),
];

const PROTECTIVE_RULES: &[(&str, f64, bool)] = &[
    ("happy|joy|grateful|thankful", -1.0, true),
    ("hopeful|looking forward|excited", -1.2, true),
    ("energetic|motivated|inspired", -0.7, true),
    ("accomplish|achievement|proud", -0.9, false),
    ("support|friend|family|love", -0.8, false),
    ("calm|peaceful|relaxed", -0.6, false),
];

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Minimal => "minimal",
            Preset::Extended => "extended",
        }
    }

    pub fn rule_set(&self) -> RuleSet {
        let pick = |table: &[(&str, f64, bool)]| -> Vec<Rule> {
            table
                .iter()
                .filter(|(_, _, minimal)| *self == Preset::Extended || *minimal)
                .map(|(pattern, weight, _)| Rule::new(*pattern, *weight))
                .collect()
        };
        RuleSet {
            risk: pick(RISK_RULES),
            protective: pick(PROTECTIVE_RULES),
        }
    }
}
