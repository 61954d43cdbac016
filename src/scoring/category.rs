use serde::Serialize;

/// Lowest possible score.
pub const SCORE_MIN: f64 = 0.0;
/// Highest possible score.
pub const SCORE_MAX: f64 = 25.0;

/// Severity band derived from a score.
///
/// Bands are half-open `[lower, upper)` and contiguous over `[0, 25]`; a score
/// sitting exactly on a boundary belongs to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Category {
    Minimal,
    Mild,
    Moderate,
    ModeratelySevere,
    Severe,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Minimal,
        Category::Mild,
        Category::Moderate,
        Category::ModeratelySevere,
        Category::Severe,
    ];

    /// Band lookup. Not restricted to the score range: anything below 5 is
    /// Minimal, anything from 20 up (or NaN) is Severe.
    pub fn from_score(score: f64) -> Self {
        if score < 5.0 {
            Category::Minimal
        } else if score < 10.0 {
            Category::Mild
        } else if score < 15.0 {
            Category::Moderate
        } else if score < 20.0 {
            Category::ModeratelySevere
        } else {
            Category::Severe
        }
    }

    /// `(lower, upper)` bounds of the band within the score range.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            Category::Minimal => (SCORE_MIN, 5.0),
            Category::Mild => (5.0, 10.0),
            Category::Moderate => (10.0, 15.0),
            Category::ModeratelySevere => (15.0, 20.0),
            Category::Severe => (20.0, SCORE_MAX),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Minimal => "Minimal",
            Category::Mild => "Mild",
            Category::Moderate => "Moderate",
            Category::ModeratelySevere => "Moderately Severe",
            Category::Severe => "Severe",
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self {
            Category::Minimal => "Minimal or no depression indicators detected",
            Category::Mild => "Mild depression indicators detected",
            Category::Moderate => "Moderate depression indicators detected",
            Category::ModeratelySevere => "Moderately severe depression indicators detected",
            Category::Severe => "Severe depression indicators detected",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Category,
    pub interpretation: &'static str,
}

/// Map a score to its category and interpretation.
pub fn classify(score: f64) -> Classification {
    let category = Category::from_score(score);
    Classification {
        category,
        interpretation: category.interpretation(),
    }
}
