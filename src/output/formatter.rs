use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::scoring::{
    AnalysisResult, Category, Classification, Rule, RuleGroup, ScoreBreakdown, SCORE_MAX,
};

const DISCLAIMER: &str = "Note: keyword-based screening aid, not a clinical assessment.";

/// A scored input ready for display
pub struct ScoredText<'a> {
    pub label: &'a str,
    pub result: &'a AnalysisResult,
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    source: &'a str,
    #[serde(flatten)]
    result: &'a AnalysisResult,
}

#[derive(Serialize)]
struct JsonRule<'a> {
    group: RuleGroup,
    pattern: &'a str,
    weight: f64,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with one decimal place ("16.3")
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Category label, colored by severity when requested
pub fn format_category(category: Category, use_colors: bool) -> String {
    let label = category.label();
    if !use_colors {
        return label.to_string();
    }
    match category {
        Category::Minimal => format!("{}", label.green()),
        Category::Mild => format!("{}", label.yellow()),
        Category::Moderate => format!("{}", label.bright_yellow()),
        Category::ModeratelySevere => format!("{}", label.red()),
        Category::Severe => format!("{}", label.bright_red().bold()),
    }
}

/// Format a single analysis. The label line is only printed when `show_label`
/// is set (several inputs in one run).
pub fn format_analysis(
    scored: &ScoredText,
    show_label: bool,
    show_breakdown: bool,
    use_colors: bool,
) -> String {
    let result = scored.result;
    let mut lines = Vec::new();

    if show_label {
        if use_colors {
            lines.push(format!("{}", scored.label.underline()));
        } else {
            lines.push(scored.label.to_string());
        }
    }

    let score = format!("{}/{}", format_score(result.score), SCORE_MAX);
    let category = format_category(result.category, use_colors);
    if use_colors {
        lines.push(format!("Score: {} ({})", score.bold(), category));
    } else {
        lines.push(format!("Score: {} ({})", score, category));
    }
    lines.push(format!("Interpretation: {}", result.interpretation));

    if show_breakdown {
        lines.push(format_breakdown(&result.breakdown, result.score, use_colors));
    }

    lines.join("\n")
}

/// Per-rule contributions, one line each, starting from the baseline
pub fn format_breakdown(breakdown: &ScoreBreakdown, score: f64, use_colors: bool) -> String {
    let mut lines = vec![format!(
        "  {:<10}  {:<40}  {:>16}",
        "baseline",
        "",
        format!("{:.2}", breakdown.baseline)
    )];

    if breakdown.contributions.is_empty() {
        lines.push("  (no rules matched)".to_string());
    }

    for c in &breakdown.contributions {
        let pattern = truncate_pattern(&c.pattern, 40);
        let group = if use_colors {
            match c.group {
                RuleGroup::Risk => format!("{:<10}", c.group.label().red()),
                RuleGroup::Protective => format!("{:<10}", c.group.label().green()),
            }
        } else {
            format!("{:<10}", c.group.label())
        };
        let effect = format!("{} x {:+.1} = {:+.2}", c.matches, c.weight, c.delta);
        lines.push(format!("  {}  {:<40}  {:>16}", group, pattern, effect));
    }

    if breakdown.raw_score != score {
        let note = format!(
            "  raw score {:.2} clamped to {}",
            breakdown.raw_score,
            format_score(score)
        );
        if use_colors {
            lines.push(format!("{}", note.dimmed()));
        } else {
            lines.push(note);
        }
    }

    lines.join("\n")
}

/// Format every analysis for terminal output, separated by blank lines
pub fn format_analyses(items: &[ScoredText], show_breakdown: bool, use_colors: bool) -> String {
    let show_labels = items.len() > 1;
    let mut blocks: Vec<String> = items
        .iter()
        .map(|scored| format_analysis(scored, show_labels, show_breakdown, use_colors))
        .collect();

    if use_colors {
        blocks.push(format!("{}", DISCLAIMER.dimmed()));
    } else {
        blocks.push(DISCLAIMER.to_string());
    }
    blocks.join("\n\n")
}

/// Format analyses as tab-separated values for scripting
/// Columns: source, score, category, interpretation (no headers, no colors)
pub fn format_tsv(items: &[ScoredText]) -> String {
    items
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}",
                scored.label,
                format_score(scored.result.score),
                scored.result.category.label(),
                scored.result.interpretation
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format analyses as a pretty JSON array, one object per input
pub fn format_json(items: &[ScoredText]) -> Result<String> {
    let entries: Vec<JsonEntry> = items
        .iter()
        .map(|scored| JsonEntry {
            source: scored.label,
            result: scored.result,
        })
        .collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize analysis results")
}

/// Score band of a category, e.g. "15-20"
fn format_band(category: Category) -> String {
    let (lower, upper) = category.bounds();
    format!("{}-{}", lower, upper)
}

/// Format a standalone classification (for `classify`), with the band it fell in
pub fn format_classification(score: f64, classification: &Classification, use_colors: bool) -> String {
    format!(
        "{} -> {} ({})\n{}",
        score,
        format_category(classification.category, use_colors),
        format_band(classification.category),
        classification.interpretation
    )
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Shorten a pattern to `max_width` chars by keeping whole alternatives and
/// counting the dropped ones: "hopeless|worthless|+1". A pattern whose first
/// alternative alone is too wide is cut mid-word instead.
fn truncate_pattern(pattern: &str, max_width: usize) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    if chars.len() <= max_width {
        return pattern.to_string();
    }

    let alternatives: Vec<&str> = pattern.split('|').collect();
    let mut kept = 0;
    let mut width = 0;
    for (i, alternative) in alternatives.iter().enumerate() {
        let next = width + usize::from(i > 0) + alternative.chars().count();
        let marker = format!("|+{}", alternatives.len() - i - 1).len();
        if next + marker > max_width {
            break;
        }
        kept = i + 1;
        width = next;
    }

    if kept > 0 {
        format!("{}|+{}", alternatives[..kept].join("|"), alternatives.len() - kept)
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a rule table with columns: Index, Group, Weight, Pattern
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_rules_table<'a>(
    rules: impl Iterator<Item = (RuleGroup, &'a Rule)>,
    baseline: f64,
    use_colors: bool,
) -> String {
    let term_width = get_terminal_width();
    // index (3) + space + group (10) + 2 + weight (6) + 2
    let fixed_width = 3 + 1 + 10 + 2 + 6 + 2;

    let mut lines = vec![format!("Baseline: {:.1}", baseline)];
    for (idx, (group, rule)) in rules.enumerate() {
        let index_str = format!("{:>2}.", idx + 1);
        let weight_str = format!("{:>+6.1}", rule.weight);
        let pattern = match term_width {
            Some(width) if width > fixed_width + 10 => {
                truncate_pattern(&rule.pattern, width - fixed_width)
            }
            Some(_) => truncate_pattern(&rule.pattern, 20),
            None => rule.pattern.clone(),
        };

        if use_colors {
            let group_str = match group {
                RuleGroup::Risk => format!("{:<10}", group.label().red()),
                RuleGroup::Protective => format!("{:<10}", group.label().green()),
            };
            lines.push(format!(
                "{} {}  {}  {}",
                index_str.dimmed(),
                group_str,
                weight_str.bold(),
                pattern
            ));
        } else {
            lines.push(format!(
                "{} {:<10}  {}  {}",
                index_str,
                group.label(),
                weight_str,
                pattern
            ));
        }
    }
    lines.join("\n")
}

/// Format a rule table as a JSON object `{ baseline, rules: [...] }`
pub fn format_rules_json<'a>(
    rules: impl Iterator<Item = (RuleGroup, &'a Rule)>,
    baseline: f64,
) -> Result<String> {
    let rules: Vec<JsonRule> = rules
        .map(|(group, rule)| JsonRule {
            group,
            pattern: &rule.pattern,
            weight: rule.weight,
        })
        .collect();
    let value = serde_json::json!({
        "baseline": baseline,
        "rules": rules,
    });
    serde_json::to_string_pretty(&value).context("Failed to serialize rule table")
}
