use serde::{Deserialize, Serialize};

/// Inclusive party-finder level range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    pub min: i64,
    pub max: i64,
}

impl LevelRange {
    pub fn contains(&self, level: i64) -> bool {
        self.min <= level && level <= self.max
    }
}

impl std::fmt::Display for LevelRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// `min = floor(level * 2 / 3)`, `max = floor(level * 3 / 2)`.
///
/// Only meaningful for `level >= 1`; a reference level of zero means "no
/// filter" and should not be passed here. Products saturate at the `i64`
/// bounds, so any input yields a range.
pub fn compute_range(level: i64) -> LevelRange {
    LevelRange {
        min: level.saturating_mul(2).div_euclid(3),
        max: level.saturating_mul(3).div_euclid(2),
    }
}

/// Zero matches everyone.
pub fn is_in_range(player_level: i64, reference_level: i64) -> bool {
    if reference_level == 0 {
        return true;
    }
    compute_range(reference_level).contains(player_level)
}

/// Reads a user-entered level. Blank, non-numeric and negative input all mean 0.
pub fn parse_level(input: &str) -> i64 {
    input.trim().parse::<i64>().map(|l| l.max(0)).unwrap_or(0)
}

/// Range text for display: `"min - max"`, or `"-"` when unfiltered.
pub fn describe_range(reference_level: i64) -> String {
    if reference_level > 0 {
        compute_range(reference_level).to_string()
    } else {
        "-".to_string()
    }
}
