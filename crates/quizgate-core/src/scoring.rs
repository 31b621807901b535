//! Percentage scoring and the revisit scoring policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How answers given after navigating backwards are counted.
///
/// `Cumulative` keeps a monotonic correct-answer counter that is bumped on
/// every forward transition, so a question answered correctly, revisited
/// with Prev and answered correctly again counts twice. `LastAnswer` keeps
/// one verdict per question slot, overwritten by each forward pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringMode {
    #[default]
    Cumulative,
    LastAnswer,
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringMode::Cumulative => write!(f, "cumulative"),
            ScoringMode::LastAnswer => write!(f, "last-answer"),
        }
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cumulative" => Ok(ScoringMode::Cumulative),
            "last-answer" | "last_answer" | "last" => Ok(ScoringMode::LastAnswer),
            other => Err(format!("unknown scoring mode: {other}")),
        }
    }
}

/// Default pass mark, in percent.
pub const DEFAULT_PASS_THRESHOLD: u8 = 50;

/// `round(100 * correct / total)`, clamped to 100.
///
/// An empty assessment scores 0 without dividing.
pub fn percentage(correct: u32, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (100.0 * correct as f64 / total as f64).round();
    pct.min(100.0) as u8
}

/// Whether `score` reaches the pass mark.
pub fn passed(score: u8, threshold: u8) -> bool {
    score >= threshold
}
