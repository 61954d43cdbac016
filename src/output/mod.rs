pub mod formatter;

pub use formatter::{
    format_analyses, format_analysis, format_breakdown, format_category, format_classification,
    format_json, format_rules_json, format_rules_table, format_score, format_tsv,
    should_use_colors, ScoredText,
};
